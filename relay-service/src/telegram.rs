//! Telegram update schema types.
//!
//! These structs mirror the wire format of Telegram's webhook payloads.
//! Only the four message-bearing variants are typed; the remaining update
//! kinds are kept as opaque JSON so a well-formed update of any kind still
//! deserializes (it is rejected later as unsupported, not as malformed).

use serde::Deserialize;
use serde_json::Value;

/// A single Telegram update as delivered to the webhook endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    /// Provider-assigned update identifier. Not unique across restarts.
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub edited_message: Option<TelegramMessage>,
    #[serde(default)]
    pub channel_post: Option<TelegramMessage>,
    #[serde(default)]
    pub edited_channel_post: Option<TelegramMessage>,

    // Update kinds without message content. Carried opaquely so they
    // survive deserialization; the normalizer rejects them explicitly.
    #[serde(default)]
    pub inline_query: Option<Value>,
    #[serde(default)]
    pub chosen_inline_result: Option<Value>,
    #[serde(default)]
    pub callback_query: Option<Value>,
    #[serde(default)]
    pub shipping_query: Option<Value>,
    #[serde(default)]
    pub pre_checkout_query: Option<Value>,
    #[serde(default)]
    pub poll: Option<Value>,
    #[serde(default)]
    pub poll_answer: Option<Value>,
    #[serde(default)]
    pub my_chat_member: Option<Value>,
    #[serde(default)]
    pub chat_member: Option<Value>,
    #[serde(default)]
    pub chat_join_request: Option<Value>,
}

impl TelegramUpdate {
    /// Select the primary message from the update.
    ///
    /// New content takes priority over edits: message > edited_message >
    /// channel_post > edited_channel_post.
    pub fn primary_message(&self) -> Option<&TelegramMessage> {
        self.message
            .as_ref()
            .or(self.edited_message.as_ref())
            .or(self.channel_post.as_ref())
            .or(self.edited_channel_post.as_ref())
    }

    /// Extract text content from the primary message: text, else caption.
    pub fn text(&self) -> Option<&str> {
        let message = self.primary_message()?;
        message.text.as_deref().or(message.caption.as_deref())
    }
}

/// A Telegram message (also used for edits and channel posts).
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    /// Unix timestamp (seconds) assigned by Telegram.
    pub date: i64,
    pub chat: TelegramChat,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub entities: Option<Vec<Value>>,
    #[serde(default)]
    pub photo: Option<Vec<Value>>,
    #[serde(default)]
    pub document: Option<Value>,
    #[serde(default)]
    pub audio: Option<Value>,
    #[serde(default)]
    pub video: Option<Value>,
}

impl TelegramMessage {
    /// Whether a photo attachment is present. Telegram sends photos as a
    /// size array; an empty array counts as no photo.
    pub fn has_photo(&self) -> bool {
        self.photo.as_ref().map(|sizes| !sizes.is_empty()).unwrap_or(false)
    }

    /// Whether formatting entities are present (same empty-array rule).
    pub fn has_entities(&self) -> bool {
        self.entities.as_ref().map(|ents| !ents.is_empty()).unwrap_or(false)
    }
}

/// The user that originated a message.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    /// private, group, supergroup, or channel
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message(text: Option<&str>) -> String {
        format!(
            r#"{{"message_id": 1, "date": 1708234567,
                "chat": {{"id": 42, "type": "private"}},
                "from": {{"id": 7, "first_name": "John"}}
                {}}}"#,
            text.map(|t| format!(r#", "text": "{}""#, t))
                .unwrap_or_default()
        )
    }

    #[test]
    fn test_primary_message_prefers_new_message() {
        let json = format!(
            r#"{{"update_id": 1, "message": {}, "edited_message": {}}}"#,
            sample_message(Some("new")),
            sample_message(Some("edited"))
        );
        let update: TelegramUpdate = serde_json::from_str(&json).unwrap();

        let primary = update.primary_message().unwrap();
        assert_eq!(primary.text.as_deref(), Some("new"));
    }

    #[test]
    fn test_primary_message_falls_back_to_channel_post() {
        let json = format!(
            r#"{{"update_id": 1, "channel_post": {}}}"#,
            sample_message(Some("post"))
        );
        let update: TelegramUpdate = serde_json::from_str(&json).unwrap();

        assert_eq!(update.text(), Some("post"));
    }

    #[test]
    fn test_text_falls_back_to_caption() {
        let json = r#"{"update_id": 1, "message": {
            "message_id": 1, "date": 0,
            "chat": {"id": 1, "type": "private"},
            "caption": "a caption",
            "photo": [{"file_id": "abc"}]
        }}"#;
        let update: TelegramUpdate = serde_json::from_str(json).unwrap();

        assert_eq!(update.text(), Some("a caption"));
        assert!(update.primary_message().unwrap().has_photo());
    }

    #[test]
    fn test_empty_photo_array_counts_as_absent() {
        let json = r#"{"update_id": 1, "message": {
            "message_id": 1, "date": 0,
            "chat": {"id": 1, "type": "private"},
            "photo": []
        }}"#;
        let update: TelegramUpdate = serde_json::from_str(json).unwrap();

        assert!(!update.primary_message().unwrap().has_photo());
    }

    #[test]
    fn test_callback_query_update_has_no_message() {
        let json = r#"{"update_id": 1, "callback_query": {"id": "1", "data": "x"}}"#;
        let update: TelegramUpdate = serde_json::from_str(json).unwrap();

        assert!(update.primary_message().is_none());
        assert!(update.callback_query.is_some());
    }
}
