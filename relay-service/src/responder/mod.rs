//! Responder abstraction for downstream reply generation.
//!
//! The pipeline treats the responder as a black box: a potentially slow,
//! potentially failing request/response exchange. `ResponderClient` wraps
//! any [`Responder`] implementation and converts failures into data — a
//! failed dispatch never aborts the request that triggered it.

pub mod rules;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::process::normalize::{InboundEvent, MessageKind};

pub use rules::RuleResponder;

/// Request handed to the responder for one inbound event.
#[derive(Debug, Clone, Serialize)]
pub struct ResponderRequest {
    /// Opaque correlation id. Defaults to zero when no identifier has
    /// been assigned upstream.
    pub webhook_id: i64,
    pub update_id: i64,
    pub chat_id: Option<i64>,
    pub user_id: Option<i64>,
    pub text: Option<String>,
    pub message_type: MessageKind,
    pub timestamp: DateTime<Utc>,
}

impl ResponderRequest {
    /// Build a request from a normalized event.
    pub fn from_event(event: &InboundEvent) -> Self {
        Self {
            webhook_id: 0,
            update_id: event.update_id,
            chat_id: event.chat_id,
            user_id: event.user_id,
            text: event.text.clone(),
            message_type: event.kind,
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of one responder exchange.
#[derive(Debug, Clone)]
pub struct ResponderResult {
    pub success: bool,
    pub response_text: Option<String>,
    pub error_message: Option<String>,
    pub elapsed_seconds: f64,
}

/// Responder liveness report for the health endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ResponderHealth {
    pub status: &'static str,
    pub processed_count: u64,
    pub timestamp: DateTime<Utc>,
}

/// A downstream reply generator.
///
/// Implementations may run in-process (rule matching) or call out to a
/// remote model backend; the pipeline only sees the contract below.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a reply for the given request.
    async fn respond(&self, request: &ResponderRequest) -> anyhow::Result<String>;

    /// Whether the responder is able to take requests.
    async fn ready(&self) -> bool {
        true
    }
}

/// Client wrapper around a pluggable [`Responder`].
///
/// Measures elapsed time per exchange, counts dispatches, and captures
/// responder failures into the returned result instead of propagating.
#[derive(Clone)]
pub struct ResponderClient {
    inner: Arc<dyn Responder>,
    dispatched: Arc<AtomicU64>,
}

impl ResponderClient {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            inner: responder,
            dispatched: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Send one request downstream and report the outcome.
    ///
    /// Never returns an error: a failure raised by the responder comes
    /// back as `success = false` with `error_message` set.
    pub async fn send(&self, request: ResponderRequest) -> ResponderResult {
        let started = Instant::now();
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        info!(
            webhook_id = request.webhook_id,
            update_id = request.update_id,
            message_type = %request.message_type,
            "responder_dispatch_start"
        );

        match self.inner.respond(&request).await {
            Ok(text) => {
                let elapsed = started.elapsed().as_secs_f64();
                info!(
                    update_id = request.update_id,
                    elapsed_seconds = elapsed,
                    "responder_dispatch_complete"
                );
                ResponderResult {
                    success: true,
                    response_text: Some(text),
                    error_message: None,
                    elapsed_seconds: elapsed,
                }
            }
            Err(e) => {
                let elapsed = started.elapsed().as_secs_f64();
                warn!(
                    update_id = request.update_id,
                    elapsed_seconds = elapsed,
                    error = %e,
                    "responder_dispatch_failed"
                );
                ResponderResult {
                    success: false,
                    response_text: None,
                    error_message: Some(e.to_string()),
                    elapsed_seconds: elapsed,
                }
            }
        }
    }

    /// Report responder health plus the number of dispatches so far.
    pub async fn health(&self) -> ResponderHealth {
        let status = if self.inner.ready().await {
            "healthy"
        } else {
            "unhealthy"
        };

        ResponderHealth {
            status,
            processed_count: self.dispatched.load(Ordering::Relaxed),
            timestamp: Utc::now(),
        }
    }
}
