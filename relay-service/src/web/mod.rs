//! Web layer for the ingestion service.
//!
//! This module provides the HTTP surface around the pipeline:
//! - Receives Telegram webhook deliveries as raw bytes
//! - Extracts the signature header and client identity
//! - Exposes liveness, health, and stats probes
//!
//! All protocol work happens in the pipeline; handlers only translate
//! between HTTP and the typed contracts.

pub mod handlers;
pub mod signature;

pub use handlers::{
    health, liveness, stats, telegram_webhook, AppState, HealthResponse, LivenessResponse,
    StatsResponse, WebhookResponse,
};
pub use signature::{is_signature_enforced, verify_signature, SIGNATURE_HEADER};
