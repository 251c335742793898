//! Error taxonomy for the ingestion pipeline.
//!
//! Every failure a single request can hit is a typed, expected outcome;
//! only `PipelineError::Internal` covers faults the pipeline did not
//! anticipate. Nothing here is retried — each error is terminal for the
//! request that produced it.

use thiserror::Error;

/// Signature verification failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A secret is configured but the request carried no signature header.
    #[error("missing signature header")]
    MissingSignature,

    /// The provided signature did not match the expected HMAC digest.
    #[error("invalid signature")]
    InvalidSignature,
}

/// Payload normalization failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body was not valid JSON at all.
    #[error("invalid JSON payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Valid JSON, but it does not fit the Telegram update schema.
    #[error("payload does not match the update schema")]
    SchemaMismatch,

    /// A well-formed update that carries none of the message variants
    /// (callback queries, polls, and similar kinds are unsupported).
    #[error("no message content in update")]
    NoMessageContent,
}

/// Terminal pipeline outcomes surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Client exceeded its admission window. Recoverable via backoff.
    #[error("rate limit exceeded")]
    RateLimited,

    /// Empty request body — rejected before signature or parse checks.
    #[error("empty request body")]
    EmptyBody,

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("webhook processing failed: {0}")]
    BadRequest(#[from] ParseError),

    /// Anything the stages above did not anticipate.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::MissingSignature.to_string(),
            "missing signature header"
        );
        assert_eq!(AuthError::InvalidSignature.to_string(), "invalid signature");
    }

    #[test]
    fn test_pipeline_error_wraps_auth_error() {
        let err = PipelineError::from(AuthError::InvalidSignature);
        assert!(matches!(
            err,
            PipelineError::Unauthorized(AuthError::InvalidSignature)
        ));
        assert_eq!(err.to_string(), "unauthorized: invalid signature");
    }

    #[test]
    fn test_pipeline_error_wraps_parse_error() {
        let err = PipelineError::from(ParseError::NoMessageContent);
        assert!(matches!(
            err,
            PipelineError::BadRequest(ParseError::NoMessageContent)
        ));
    }
}
