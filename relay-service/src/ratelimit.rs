//! Sliding-window rate limiting keyed by client identity.
//!
//! This is a sliding-window counter, not a token bucket: each client gets
//! a window of raw admission timestamps, and a request is admitted iff
//! the count of timestamps inside the trailing window is below the limit.
//! Entries older than the window are purged lazily on every check.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

/// Per-client sliding-window admission control.
///
/// The window map is guarded by a single async mutex. The critical section
/// is O(window size) per call and is never held across the responder
/// dispatch, so contention stays short-lived even under bursts.
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    windows: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter admitting at most `limit` requests per client
    /// within any trailing `window`.
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether a request from `client_id` at `now` is admitted.
    ///
    /// Purges expired timestamps, then admits and records the request iff
    /// the remaining in-window count is below the limit. Rejected requests
    /// are not recorded.
    pub async fn admit(&self, client_id: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().await;
        let timestamps = windows.entry(client_id.to_string()).or_default();

        timestamps.retain(|&t| now.duration_since(t) < self.window);

        if timestamps.len() >= self.limit {
            return false;
        }

        timestamps.push(now);
        true
    }

    /// Drop clients whose windows hold no live timestamps.
    ///
    /// Without this sweep the per-client map grows without bound for
    /// clients that stop sending requests. Returns the number of clients
    /// evicted.
    pub async fn evict_idle(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();

        windows.retain(|_, timestamps| {
            timestamps
                .iter()
                .any(|&t| now.duration_since(t) < self.window)
        });

        let evicted = before - windows.len();
        if evicted > 0 {
            debug!(evicted = evicted, remaining = windows.len(), "rate_limiter_evicted_idle");
        }
        evicted
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}
