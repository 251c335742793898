//! Ingestion pipeline: one request-processing unit.
//!
//! ## Processing Flow
//!
//! ```text
//! rate check → reject empty → verify signature → parse → dispatch → record
//! ```
//!
//! The stages run linearly with no retries; the four checks short-circuit
//! with a typed error, while a responder failure collapses into the
//! returned record instead of failing the request.

pub mod normalize;

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::error::PipelineError;
use crate::ratelimit::RateLimiter;
use crate::responder::{ResponderClient, ResponderRequest};
use crate::stats::StatsCollector;
use crate::web::signature::verify_signature;

pub use normalize::{parse_update, InboundEvent, MessageKind};

/// Outcome of forwarding one event to the responder.
///
/// Produced for every request that reaches dispatch, including those
/// where the responder itself failed.
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    pub event: InboundEvent,
    pub sent_to_responder: bool,
    pub response_text: Option<String>,
    pub error_message: Option<String>,
}

/// Orchestrates rate limiting, authentication, normalization, dispatch,
/// and statistics accounting for inbound webhooks.
///
/// All collaborators are injected at construction and shared across
/// request tasks; the pipeline itself holds no per-request state.
pub struct Pipeline {
    limiter: Arc<RateLimiter>,
    stats: Arc<StatsCollector>,
    responder: ResponderClient,
    webhook_secret: String,
}

impl Pipeline {
    /// Build a pipeline. An empty `webhook_secret` disables signature
    /// enforcement entirely.
    pub fn new(
        limiter: Arc<RateLimiter>,
        stats: Arc<StatsCollector>,
        responder: ResponderClient,
        webhook_secret: String,
    ) -> Self {
        Self {
            limiter,
            stats,
            responder,
            webhook_secret,
        }
    }

    /// Process one inbound webhook request.
    ///
    /// Terminal failures at the rate, empty-body, signature, and parse
    /// stages increment the error counter; completing dispatch increments
    /// the processed counter regardless of the responder's own outcome.
    pub async fn process(
        &self,
        client_id: &str,
        body: &[u8],
        provided_token: Option<&str>,
    ) -> Result<DispatchRecord, PipelineError> {
        let result = self.run(client_id, body, provided_token).await;

        match &result {
            Ok(record) => {
                self.stats.record_success();
                info!(
                    client_id = %client_id,
                    update_id = record.event.update_id,
                    message_type = %record.event.kind,
                    sent_to_responder = record.sent_to_responder,
                    "webhook_processed"
                );
            }
            Err(e) => {
                self.stats.record_error();
                info!(client_id = %client_id, error = %e, "webhook_rejected");
            }
        }

        result
    }

    async fn run(
        &self,
        client_id: &str,
        body: &[u8],
        provided_token: Option<&str>,
    ) -> Result<DispatchRecord, PipelineError> {
        if !self.limiter.admit(client_id, Instant::now()).await {
            return Err(PipelineError::RateLimited);
        }

        // An empty body cannot carry a meaningful signature payload, so
        // it is rejected before the signature and parse stages.
        if body.is_empty() {
            return Err(PipelineError::EmptyBody);
        }

        verify_signature(&self.webhook_secret, body, provided_token)?;

        let event = parse_update(body)?;

        let request = ResponderRequest::from_event(&event);
        let outcome = self.responder.send(request).await;

        Ok(DispatchRecord {
            event,
            sent_to_responder: outcome.success,
            response_text: outcome.response_text,
            error_message: outcome.error_message,
        })
    }

    /// Snapshot of the pipeline counters.
    pub fn stats(&self) -> crate::stats::Stats {
        self.stats.snapshot()
    }
}
