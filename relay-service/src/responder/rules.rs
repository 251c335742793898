//! Keyword-rule responder.
//!
//! Reference [`Responder`] implementation: matches a handful of Russian
//! and English keywords and echoes everything else. The processing delay
//! is simulated so the pipeline's behavior under slow responders can be
//! exercised without a real backend.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::sleep;

use super::{Responder, ResponderRequest};

/// Rule-based reply generator with a configurable simulated delay.
pub struct RuleResponder {
    delay: Duration,
}

impl RuleResponder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for RuleResponder {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl Responder for RuleResponder {
    async fn respond(&self, request: &ResponderRequest) -> anyhow::Result<String> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let text = match request.text.as_deref() {
            Some(t) => t,
            None => return Ok("Получено сообщение без текста".to_string()),
        };

        Ok(generate_reply(text))
    }
}

/// Match the message text against the keyword rules.
fn generate_reply(text: &str) -> String {
    let lowered = text.to_lowercase();
    let lowered = lowered.trim();

    if lowered.contains("привет") || lowered.contains("hello") {
        "Привет! Рад вас видеть!".to_string()
    } else if lowered.contains("помощь") || lowered.contains("help") {
        "Я могу помочь вам с различными вопросами. Что вам нужно?".to_string()
    } else if lowered.contains("время") || lowered.contains("time") {
        format!("Текущее время: {}", Utc::now().format("%H:%M:%S"))
    } else if lowered.contains('?') {
        "Интересный вопрос! Я подумаю над этим.".to_string()
    } else {
        format!("Получено сообщение: '{}'", text)
    }
}
