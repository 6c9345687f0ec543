//! Progress events emitted while a batch runs

use std::fmt;
use std::sync::Arc;

use super::metrics::BatchOutcome;

/// Callback receiving batch progress events
pub type EventCallback = Arc<dyn Fn(BatchEvent) + Send + Sync>;

/// Why an item never reached the rate limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingKey,
    Protected,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingKey => write!(f, "missing key"),
            SkipReason::Protected => write!(f, "protected"),
        }
    }
}

/// Events emitted during pagination and batch execution
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    PageFetched {
        label: String,
        start_index: u32,
        count: usize,
        total_count: Option<u32>,
    },
    ItemSucceeded {
        label: String,
        key: String,
    },
    ItemFailed {
        label: String,
        key: Option<String>,
        error: String,
    },
    ItemSkipped {
        label: String,
        name: String,
        reason: SkipReason,
    },
    BatchComplete {
        label: String,
        outcome: BatchOutcome,
    },
}

pub(crate) fn emit(callback: &Option<EventCallback>, event: BatchEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
