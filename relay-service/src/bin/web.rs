//! HookRelay Web Server - Telegram webhook ingestion service.
//!
//! This binary wires the service together:
//! - Receives Telegram webhook deliveries
//! - Verifies signatures and enforces per-client rate limits
//! - Normalizes payloads and dispatches them to the responder
//! - Exposes liveness, health, and stats probes

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hookrelay::web::{health, liveness, stats, telegram_webhook, AppState};
use hookrelay::{Config, Pipeline, RateLimiter, ResponderClient, RuleResponder, StatsCollector};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        host = %config.host,
        port = config.port,
        signature_enforced = config.webhook_secret.is_some(),
        rate_limit = config.rate_limit,
        rate_limit_window_secs = config.rate_limit_window_secs,
        max_request_size = config.max_request_size,
        "config_loaded"
    );

    // Construct the shared services explicitly; their lifetime is bound
    // to the process and they are injected into the pipeline.
    let window = Duration::from_secs(config.rate_limit_window_secs);
    let limiter = Arc::new(RateLimiter::new(config.rate_limit, window));
    let collector = Arc::new(StatsCollector::new());
    let responder = ResponderClient::new(Arc::new(RuleResponder::new(Duration::from_millis(
        config.responder_delay_ms,
    ))));

    let pipeline = Arc::new(Pipeline::new(
        limiter.clone(),
        collector.clone(),
        responder.clone(),
        config.webhook_secret_or_empty(),
    ));

    let state = AppState::new(pipeline, responder, collector);

    // Periodically drop rate-limiter entries for clients that went quiet.
    let sweeper = limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(window);
        interval.tick().await;
        loop {
            interval.tick().await;
            sweeper.evict_idle(Instant::now()).await;
        }
    });

    // Build the router
    let app = Router::new()
        .route("/", get(liveness))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/webhook/telegram", post(telegram_webhook))
        .layer(DefaultBodyLimit::max(config.max_request_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address
    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST value: {}", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
