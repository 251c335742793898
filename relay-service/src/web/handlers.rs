//! Webhook endpoint handlers.
//!
//! The webhook handler extracts the raw body bytes and the signature
//! header, hands both to the pipeline, and maps the typed outcome onto an
//! HTTP status. A responder failure inside a completed dispatch is still
//! a 200 — the diagnostic fields in the response body carry the detail.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::process::{DispatchRecord, MessageKind, Pipeline};
use crate::responder::{ResponderClient, ResponderHealth};
use crate::stats::{Stats, StatsCollector};
use crate::web::signature::SIGNATURE_HEADER;

/// Service name reported by the health endpoints.
const SERVICE_NAME: &str = "hookrelay";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub responder: ResponderClient,
    pub stats: Arc<StatsCollector>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<Pipeline>,
        responder: ResponderClient,
        stats: Arc<StatsCollector>,
    ) -> Self {
        Self {
            pipeline,
            responder,
            stats,
        }
    }
}

// =============================================================================
// Health and Stats
// =============================================================================

/// Static liveness response.
#[derive(Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Liveness probe. No dependencies are consulted.
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Detailed health response with per-component reports.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
    pub components: HealthComponents,
}

#[derive(Serialize)]
pub struct HealthComponents {
    pub responder: ResponderHealth,
    pub webhook_processor: Stats,
}

/// Detailed health probe: responder health plus pipeline counters.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let responder = state.responder.health().await;

    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Utc::now(),
        components: HealthComponents {
            responder,
            webhook_processor: state.stats.snapshot(),
        },
    })
}

/// Stats response combining pipeline counters and responder health.
#[derive(Serialize)]
pub struct StatsResponse {
    pub webhook_stats: Stats,
    pub responder_stats: ResponderHealth,
}

/// Read-only statistics probe.
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        webhook_stats: state.stats.snapshot(),
        responder_stats: state.responder.health().await,
    })
}

// =============================================================================
// Telegram Webhook
// =============================================================================

/// Caller-facing webhook processing summary.
#[derive(Serialize)]
pub struct ProcessedData {
    pub update_id: i64,
    pub chat_id: Option<i64>,
    pub user_id: Option<i64>,
    pub message_type: MessageKind,
    pub sent_to_responder: bool,
    pub response_text: Option<String>,
}

impl From<&DispatchRecord> for ProcessedData {
    fn from(record: &DispatchRecord) -> Self {
        Self {
            update_id: record.event.update_id,
            chat_id: record.event.chat_id,
            user_id: record.event.user_id,
            message_type: record.event.kind,
            sent_to_responder: record.sent_to_responder,
            response_text: record.response_text.clone(),
        }
    }
}

/// Webhook response envelope.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_data: Option<ProcessedData>,
}

impl WebhookResponse {
    fn processed(record: &DispatchRecord) -> Self {
        Self {
            success: true,
            message: "Webhook processed successfully".to_string(),
            timestamp: Utc::now(),
            processed_data: Some(ProcessedData::from(record)),
        }
    }

    fn rejected(message: String) -> Self {
        Self {
            success: false,
            message,
            timestamp: Utc::now(),
            processed_data: None,
        }
    }
}

/// Map a pipeline error onto its HTTP status.
fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        PipelineError::EmptyBody => StatusCode::BAD_REQUEST,
        PipelineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        PipelineError::BadRequest(_) => StatusCode::BAD_REQUEST,
        PipelineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Main webhook ingestion endpoint.
pub async fn telegram_webhook(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let client_id = addr.ip().to_string();
    let provided_token = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    info!(
        client_id = %client_id,
        body_length = body.len(),
        has_signature = provided_token.is_some(),
        "telegram_webhook_received"
    );

    match state.pipeline.process(&client_id, &body, provided_token).await {
        Ok(record) => (StatusCode::OK, Json(WebhookResponse::processed(&record))),
        Err(e) => {
            let status = status_for(&e);
            warn!(
                client_id = %client_id,
                status = status.as_u16(),
                error = %e,
                "telegram_webhook_rejected"
            );
            (status, Json(WebhookResponse::rejected(e.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, ParseError};
    use crate::process::normalize::InboundEvent;

    fn record() -> DispatchRecord {
        DispatchRecord {
            event: InboundEvent {
                update_id: 42,
                chat_id: Some(7),
                user_id: Some(9),
                text: Some("hi".to_string()),
                kind: MessageKind::Text,
                received_at: Utc::now(),
            },
            sent_to_responder: true,
            response_text: Some("reply".to_string()),
            error_message: None,
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&PipelineError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(status_for(&PipelineError::EmptyBody), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&PipelineError::Unauthorized(AuthError::MissingSignature)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&PipelineError::BadRequest(ParseError::SchemaMismatch)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&PipelineError::Internal(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_success_response_serialization() {
        let response = WebhookResponse::processed(&record());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["processed_data"]["update_id"], 42);
        assert_eq!(json["processed_data"]["message_type"], "text");
        assert_eq!(json["processed_data"]["sent_to_responder"], true);
    }

    #[test]
    fn test_rejected_response_omits_processed_data() {
        let response = WebhookResponse::rejected("rate limit exceeded".to_string());
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("processed_data"));
        assert!(json.contains("rate limit exceeded"));
    }
}
