//! Batch counters and the final per-batch report
//!
//! Counters only ever grow during a run; `snapshot` freezes them into a
//! `BatchOutcome` once the batch completes.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{info, warn};

/// Live counters for one batch run
#[derive(Debug, Default)]
pub struct BatchMetrics {
    pub fetched: AtomicU64,
    pub attempted: AtomicU64,
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
    pub skipped: AtomicU64,
}

impl BatchMetrics {
    pub fn record_fetched(&self, count: u64) {
        self.fetched.fetch_add(count, Ordering::Relaxed);
    }

    /// Record that an item reached the rate limiter
    pub fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current counts
    pub fn snapshot(&self) -> BatchOutcome {
        BatchOutcome {
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    pub fn fetched(&self) -> u64 {
        self.fetched.load(Ordering::Relaxed)
    }
}

/// Final counts of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl BatchOutcome {
    /// Success rate over attempted items (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.attempted as f64
        }
    }
}

/// One item that failed, with enough context to find it again
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFailure {
    pub key: Option<String>,
    pub name: String,
    pub error: String,
    pub category: &'static str,
}

/// Result of one batch: counts, failures and timing
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub label: String,
    /// Items pulled from the remote collection (0 for template-driven batches)
    pub fetched: u64,
    pub outcome: BatchOutcome,
    pub failures: Vec<ItemFailure>,
    pub duration: Duration,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Emit the summary event for this batch
    pub fn log_summary(&self) {
        let BatchOutcome {
            attempted,
            succeeded,
            failed,
            skipped,
        } = self.outcome;

        if failed > 0 {
            warn!(
                batch = %self.label,
                fetched = self.fetched,
                attempted,
                succeeded,
                failed,
                skipped,
                duration_ms = self.duration.as_millis() as u64,
                "Batch finished with failures"
            );
            for failure in &self.failures {
                warn!(
                    batch = %self.label,
                    key = failure.key.as_deref().unwrap_or("-"),
                    name = %failure.name,
                    category = failure.category,
                    error = %failure.error,
                    "Failed item"
                );
            }
        } else {
            info!(
                batch = %self.label,
                fetched = self.fetched,
                attempted,
                succeeded,
                failed,
                skipped,
                duration_ms = self.duration.as_millis() as u64,
                "Batch complete"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counts() {
        let metrics = BatchMetrics::default();
        metrics.record_fetched(3);
        for _ in 0..3 {
            metrics.record_attempt();
        }
        metrics.record_success();
        metrics.record_success();
        metrics.record_failure();
        metrics.record_skip();

        let outcome = metrics.snapshot();
        assert_eq!(
            outcome,
            BatchOutcome {
                attempted: 3,
                succeeded: 2,
                failed: 1,
                skipped: 1
            }
        );
        assert_eq!(metrics.fetched(), 3);
        assert!((outcome.success_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_outcome_has_zero_rate() {
        assert_eq!(BatchOutcome::default().success_rate(), 0.0);
    }
}
