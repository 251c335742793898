//! Configuration module for environment variable parsing.
//!
//! All knobs come from environment variables with sensible defaults, so
//! the service starts with no configuration at all (signature enforcement
//! stays off until a secret is provided).

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the web server binds to
    pub host: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret for webhook signature verification.
    /// Unset or empty disables signature enforcement.
    pub webhook_secret: Option<String>,

    /// Maximum admitted requests per client within the rate window
    pub rate_limit: usize,

    /// Rate window length in seconds
    pub rate_limit_window_secs: u64,

    /// Maximum accepted request body size in bytes
    pub max_request_size: usize,

    /// Simulated responder processing delay in milliseconds
    pub responder_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),

            webhook_secret: env::var("WEBHOOK_SECRET_TOKEN")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            rate_limit: env::var("RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),

            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),

            max_request_size: env::var("MAX_REQUEST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024 * 1024), // 1 MiB default

            responder_delay_ms: env::var("RESPONDER_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
        }
    }

    /// The secret handed to the pipeline; empty string means disabled.
    pub fn webhook_secret_or_empty(&self) -> String {
        self.webhook_secret.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_unset() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 8000,
            webhook_secret: None,
            rate_limit: 100,
            rate_limit_window_secs: 60,
            max_request_size: 1024 * 1024,
            responder_delay_ms: 100,
        };

        assert_eq!(config.webhook_secret_or_empty(), "");
    }

    #[test]
    fn test_from_env_reads_values() {
        env::set_var("TEST_HOOKRELAY_RATE", "25");
        let parsed: usize = env::var("TEST_HOOKRELAY_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);
        assert_eq!(parsed, 25);
        env::remove_var("TEST_HOOKRELAY_RATE");
    }

    #[test]
    fn test_blank_secret_treated_as_unset() {
        env::set_var("WEBHOOK_SECRET_TOKEN", "   ");
        let config = Config::from_env();
        assert_eq!(config.webhook_secret, None);
        env::remove_var("WEBHOOK_SECRET_TOKEN");
    }
}
