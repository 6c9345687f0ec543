//! Batch execution: one throttled operation per item
//!
//! A failing item is counted and logged, then the batch moves on. Only
//! pagination failures stop a batch.

use std::collections::HashSet;
use std::future::Future;
use std::time::Instant;
use tracing::{error, info, warn};

use super::capability::Lister;
use super::core::progress::emit;
use super::core::{
    BatchEvent, BatchItem, BatchMetrics, BatchOutcome, BatchReport, EventCallback, ItemFailure,
    MigrateError, Result, SkipReason,
};
use super::limiter::RateLimiter;
use super::paginator::Paginator;
use super::protect::ProtectedSet;

/// Order in which the items of each fetched page are processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageOrder {
    #[default]
    AsListed,
    /// Last item first; deletes children before the parents listed above them
    Reversed,
}

/// What happened to a single item
#[derive(Debug)]
pub enum ItemOutcome<R> {
    Succeeded(R),
    Failed(MigrateError),
    Skipped(SkipReason),
}

impl<R> ItemOutcome<R> {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Succeeded(_))
    }

    /// Whether the item can be assumed gone from the remote collection
    ///
    /// A 404 means someone else removed it, e.g. a cascading parent delete.
    pub fn is_gone(&self) -> bool {
        match self {
            ItemOutcome::Succeeded(_) => true,
            ItemOutcome::Failed(e) => e.status() == Some(404),
            ItemOutcome::Skipped(_) => false,
        }
    }

    pub fn into_output(self) -> Option<R> {
        match self {
            ItemOutcome::Succeeded(output) => Some(output),
            _ => None,
        }
    }
}

/// Drives per-item operations through the shared rate limiter
#[derive(Clone)]
pub struct BatchExecutor {
    limiter: RateLimiter,
    events: Option<EventCallback>,
}

impl BatchExecutor {
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            limiter,
            events: None,
        }
    }

    pub fn with_events(mut self, callback: EventCallback) -> Self {
        self.events = Some(callback);
        self
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Begin a batch whose items the caller feeds one at a time
    pub fn start(&self, label: impl Into<String>) -> BatchRun<'_> {
        let label = label.into();
        info!(batch = %label, "Starting batch");
        BatchRun {
            executor: self,
            label,
            metrics: BatchMetrics::default(),
            failures: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Run `operation` for every item in order
    ///
    /// The operation receives the item's key and the item itself.
    pub async fn run<T, F, Fut, R>(
        &self,
        label: &str,
        items: Vec<T>,
        protected: Option<&ProtectedSet>,
        mut operation: F,
    ) -> BatchReport
    where
        T: BatchItem,
        F: FnMut(String, T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut run = self.start(label);
        for item in items {
            run.process(item, protected, &mut operation).await;
        }
        run.finish()
    }

    /// Read a whole collection, then run `operation` for each item
    pub async fn fetch_and_run<L, F, Fut, R>(
        &self,
        label: &str,
        paginator: &Paginator,
        lister: &L,
        protected: Option<&ProtectedSet>,
        mut operation: F,
    ) -> Result<BatchReport>
    where
        L: Lister,
        L::Item: BatchItem,
        F: FnMut(String, L::Item) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let items = paginator.fetch_all(label, lister).await?;
        let mut run = self.start(label);
        run.record_fetched(items.len() as u64);
        for item in items {
            run.process(item, protected, &mut operation).await;
        }
        Ok(run.finish())
    }

    /// Empty a collection page by page with a destructive `operation`
    ///
    /// Items that are skipped or fail stay in the collection; the drain
    /// cursor is told so that the next poll starts after them. A pass that
    /// ended past the head is followed by another pass from offset 0, since
    /// an item counted as remaining may have been removed by a neighbour's
    /// delete. Items already handed out are never processed twice; the drain
    /// ends after a pass that finds nothing new.
    pub async fn drain_and_run<L, F, Fut, R>(
        &self,
        label: &str,
        paginator: &Paginator,
        lister: &L,
        protected: Option<&ProtectedSet>,
        order: PageOrder,
        mut operation: F,
    ) -> Result<BatchReport>
    where
        L: Lister,
        L::Item: BatchItem,
        F: FnMut(String, L::Item) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let mut run = self.start(label);
        let mut drain = paginator.drain(label, lister);
        let mut handled: HashSet<String> = HashSet::new();

        loop {
            let mut new_items = 0usize;

            while let Some(mut items) = drain.next_page().await? {
                if order == PageOrder::Reversed {
                    items.reverse();
                }
                let page_items = items.len();

                let mut retained = 0usize;
                for item in items {
                    let identity = item.key().unwrap_or_else(|| item.display_name());
                    if !handled.insert(identity) {
                        retained += 1;
                        continue;
                    }
                    new_items += 1;
                    run.record_fetched(1);
                    if !run.process(item, protected, &mut operation).await.is_gone() {
                        retained += 1;
                    }
                }
                drain.retain(retained);

                let totals = run.outcome();
                info!(
                    batch = label,
                    page_items,
                    retained,
                    total_succeeded = totals.succeeded,
                    total_skipped = totals.skipped,
                    total_failed = totals.failed,
                    "Completed page"
                );
            }

            if drain.offset() == 0 || new_items == 0 {
                break;
            }
            info!(
                batch = label,
                retained = drain.offset(),
                "Rescanning from the head for items passed over"
            );
            drain.restart();
        }

        Ok(run.finish())
    }
}

/// State of one batch in progress
///
/// Owns the counters and failure list until [`BatchRun::finish`].
pub struct BatchRun<'a> {
    executor: &'a BatchExecutor,
    label: String,
    metrics: BatchMetrics,
    failures: Vec<ItemFailure>,
    started: Instant,
}

impl<'a> BatchRun<'a> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn record_fetched(&self, count: u64) {
        self.metrics.record_fetched(count);
    }

    pub fn outcome(&self) -> BatchOutcome {
        self.metrics.snapshot()
    }

    pub fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }

    /// Check preconditions, then attempt the item
    pub async fn process<T, F, Fut, R>(
        &mut self,
        item: T,
        protected: Option<&ProtectedSet>,
        operation: F,
    ) -> ItemOutcome<R>
    where
        T: BatchItem,
        F: FnOnce(String, T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        if item.key().is_none() {
            self.skip(&item, SkipReason::MissingKey);
            return ItemOutcome::Skipped(SkipReason::MissingKey);
        }
        if protected.is_some_and(|set| set.is_protected(&item)) {
            self.skip(&item, SkipReason::Protected);
            return ItemOutcome::Skipped(SkipReason::Protected);
        }
        self.attempt(item, operation).await
    }

    /// Count the item as skipped without scheduling anything
    pub fn skip<T: BatchItem>(&self, item: &T, reason: SkipReason) {
        self.metrics.record_skip();
        let name = item.display_name();
        match reason {
            SkipReason::MissingKey => {
                warn!(batch = %self.label, name = %name, "Item has no key, skipping")
            }
            SkipReason::Protected => info!(
                batch = %self.label,
                name = %name,
                protection_key = item.protection_key().unwrap_or("-"),
                "Skipping protected item"
            ),
        }
        emit(
            &self.executor.events,
            BatchEvent::ItemSkipped {
                label: self.label.clone(),
                name,
                reason,
            },
        );
    }

    /// Count the item as failed before it reached the limiter
    pub fn fail_unattempted<T: BatchItem>(&mut self, item: &T, error: MigrateError) {
        self.metrics.record_failure();
        self.record_failure(item.key(), item.display_name(), &error);
    }

    /// Schedule the operation for one item and record how it went
    pub async fn attempt<T, F, Fut, R>(&mut self, item: T, operation: F) -> ItemOutcome<R>
    where
        T: BatchItem,
        F: FnOnce(String, T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let key = item.key();
        let name = item.display_name();
        let target = key.clone().unwrap_or_else(|| name.clone());

        self.metrics.record_attempt();
        let result = self
            .executor
            .limiter
            .schedule(|| operation(target.clone(), item))
            .await;

        match result {
            Ok(output) => {
                self.metrics.record_success();
                info!(batch = %self.label, key = %target, name = %name, "Processed item");
                emit(
                    &self.executor.events,
                    BatchEvent::ItemSucceeded {
                        label: self.label.clone(),
                        key: target,
                    },
                );
                ItemOutcome::Succeeded(output)
            }
            Err(e) => {
                self.metrics.record_failure();
                self.record_failure(key, name, &e);
                ItemOutcome::Failed(e)
            }
        }
    }

    fn record_failure(&mut self, key: Option<String>, name: String, error: &MigrateError) {
        error!(
            batch = %self.label,
            key = key.as_deref().unwrap_or("-"),
            name = %name,
            category = error.category(),
            error = %error,
            "Item failed - continuing with next item"
        );
        emit(
            &self.executor.events,
            BatchEvent::ItemFailed {
                label: self.label.clone(),
                key: key.clone(),
                error: error.to_string(),
            },
        );
        self.failures.push(ItemFailure {
            key,
            name,
            error: error.to_string(),
            category: error.category(),
        });
    }

    /// Freeze the counters and emit the summary
    pub fn finish(self) -> BatchReport {
        let outcome = self.metrics.snapshot();
        emit(
            &self.executor.events,
            BatchEvent::BatchComplete {
                label: self.label.clone(),
                outcome,
            },
        );

        let report = BatchReport {
            label: self.label,
            fetched: self.metrics.fetched(),
            outcome,
            failures: self.failures,
            duration: self.started.elapsed(),
        };
        report.log_summary();
        report
    }
}
