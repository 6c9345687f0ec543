//! Global throttle for remote calls
//!
//! At most one scheduled operation runs at a time, and consecutive
//! operations start at least `min_time` apart. Waiters are served in
//! submission order because tokio's mutex is fair.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

#[derive(Debug)]
struct LimiterState {
    last_start: Option<Instant>,
}

/// Serializing rate limiter shared by every batch in the process
///
/// Clones share the same queue. Operations passed to `schedule` must not
/// schedule on the same limiter themselves, or they wait on their own slot.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_time: Duration,
    state: Arc<Mutex<LimiterState>>,
}

impl RateLimiter {
    pub fn new(min_time: Duration) -> Self {
        Self {
            min_time,
            state: Arc::new(Mutex::new(LimiterState { last_start: None })),
        }
    }

    pub fn min_time(&self) -> Duration {
        self.min_time
    }

    /// Run `operation` once every earlier submission has started and the
    /// spacing interval has passed. Its output, error or not, is returned
    /// unchanged.
    pub async fn schedule<F, Fut, T>(&self, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        // Holding the guard for the whole call keeps concurrency at one.
        let mut state = self.state.lock().await;
        if let Some(previous) = state.last_start {
            sleep_until(previous + self.min_time).await;
        }
        state.last_start = Some(Instant::now());
        operation().await
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}
