//! Process-wide ingestion counters.
//!
//! Counters are lock-free atomics updated by every request on completion
//! and read by the health and stats endpoints. They live for the process
//! lifetime and reset only on restart.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Shared counter state for the ingestion pipeline.
#[derive(Debug, Default)]
pub struct StatsCollector {
    processed: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub processed_count: u64,
    pub error_count: u64,
    pub success_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request that completed the full pipeline.
    pub fn record_success(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that hit a terminal failure before dispatch.
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of the counters.
    ///
    /// The snapshot is a copy, not a live view; concurrent increments
    /// after the loads are not reflected.
    pub fn snapshot(&self) -> Stats {
        let processed = self.processed.load(Ordering::Relaxed);
        let errors = self.errors.load(Ordering::Relaxed);
        let total = processed + errors;

        let success_rate = if total > 0 {
            processed as f64 / total as f64
        } else {
            0.0
        };

        Stats {
            processed_count: processed,
            error_count: errors,
            success_rate,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_empty() {
        let stats = StatsCollector::new();
        let snapshot = stats.snapshot();

        assert_eq!(snapshot.processed_count, 0);
        assert_eq!(snapshot.error_count, 0);
        assert_eq!(snapshot.success_rate, 0.0);
    }

    #[test]
    fn test_snapshot_counts_and_rate() {
        let stats = StatsCollector::new();
        for _ in 0..3 {
            stats.record_success();
        }
        stats.record_error();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.processed_count, 3);
        assert_eq!(snapshot.error_count, 1);
        assert_eq!(snapshot.success_rate, 0.75);
    }

    #[test]
    fn test_counters_are_monotonic_across_snapshots() {
        let stats = StatsCollector::new();
        stats.record_success();
        let first = stats.snapshot();
        stats.record_error();
        let second = stats.snapshot();

        assert!(second.processed_count >= first.processed_count);
        assert!(second.error_count >= first.error_count);
    }
}
