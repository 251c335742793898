//! Payload normalization: raw webhook bytes into an `InboundEvent`.
//!
//! Decoding happens in two stages so failures stay distinguishable: bytes
//! that are not JSON at all are malformed, valid JSON that does not fit
//! the update schema is a schema mismatch, and a well-formed update with
//! no message variant carries no processable content.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ParseError;
use crate::telegram::{TelegramMessage, TelegramUpdate};

/// Content classification for an inbound message.
///
/// Evaluated as a fixed priority chain, top to bottom, stopping at the
/// first match. `Unknown` only appears when the update carries no message
/// variant at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Photo,
    Document,
    Audio,
    Video,
    Entities,
    Other,
    Unknown,
}

impl MessageKind {
    /// Classify an update's primary message.
    pub fn classify(update: &TelegramUpdate) -> Self {
        let message = match update.primary_message() {
            Some(m) => m,
            None => return MessageKind::Unknown,
        };

        if message.text.is_some() {
            MessageKind::Text
        } else if message.has_photo() {
            MessageKind::Photo
        } else if message.document.is_some() {
            MessageKind::Document
        } else if message.audio.is_some() {
            MessageKind::Audio
        } else if message.video.is_some() {
            MessageKind::Video
        } else if message.has_entities() {
            MessageKind::Entities
        } else {
            MessageKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Photo => "photo",
            MessageKind::Document => "document",
            MessageKind::Audio => "audio",
            MessageKind::Video => "video",
            MessageKind::Entities => "entities",
            MessageKind::Other => "other",
            MessageKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized representation of one inbound notification.
///
/// Constructed once per request by the normalizer and immutable
/// thereafter. Not persisted beyond the request's lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct InboundEvent {
    pub update_id: i64,
    pub chat_id: Option<i64>,
    pub user_id: Option<i64>,
    pub text: Option<String>,
    pub kind: MessageKind,
    pub received_at: DateTime<Utc>,
}

/// Parse raw webhook bytes into a normalized event.
///
/// Fails with `MalformedPayload` when the body is not valid JSON,
/// `SchemaMismatch` when it is valid JSON but not a recognizable update,
/// and `NoMessageContent` when the update carries none of the four
/// message variants.
pub fn parse_update(body: &[u8]) -> Result<InboundEvent, ParseError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let update: TelegramUpdate =
        serde_json::from_value(value).map_err(|_| ParseError::SchemaMismatch)?;

    normalize_update(&update)
}

/// Build an `InboundEvent` from an already-decoded update.
pub fn normalize_update(update: &TelegramUpdate) -> Result<InboundEvent, ParseError> {
    let message: &TelegramMessage =
        update.primary_message().ok_or(ParseError::NoMessageContent)?;

    Ok(InboundEvent {
        update_id: update.update_id,
        chat_id: Some(message.chat.id),
        user_id: message.from.as_ref().map(|user| user.id),
        text: update.text().map(str::to_string),
        kind: MessageKind::classify(update),
        received_at: Utc::now(),
    })
}
