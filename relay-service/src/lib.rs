//! HookRelay - async webhook ingestion service for Telegram updates.
//!
//! This library provides the modules behind the `hookrelay-web` binary:
//! signature authentication, payload normalization, sliding-window rate
//! limiting, dispatch to a pluggable responder, and statistics accounting.
//!
//! ## Architecture
//!
//! ```text
//! Telegram → Web Server → Pipeline → Responder
//!                           │
//!                           └─ rate limit · signature · normalize · stats
//! ```

pub mod config;
pub mod error;
pub mod process;
pub mod ratelimit;
pub mod responder;
pub mod stats;
pub mod telegram;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::{AuthError, ParseError, PipelineError};
pub use process::{parse_update, DispatchRecord, InboundEvent, MessageKind, Pipeline};
pub use ratelimit::RateLimiter;
pub use responder::{
    Responder, ResponderClient, ResponderHealth, ResponderRequest, ResponderResult, RuleResponder,
};
pub use stats::{Stats, StatsCollector};
pub use telegram::{TelegramChat, TelegramMessage, TelegramUpdate, TelegramUser};
pub use web::AppState;
