//! Page-by-page collection reads
//!
//! Two modes:
//! - [`Paginator::fetch_all`] walks offsets forward and accumulates every item,
//!   for read-only batches.
//! - [`Paginator::drain`] re-polls the head of a collection that shrinks as the
//!   caller deletes what it was handed.
//!
//! Every list call goes through the rate limiter. A failed call aborts the
//! read; nothing fetched so far is returned.

use tracing::{debug, error, info};

use super::capability::Lister;
use super::core::progress::emit;
use super::core::{BatchEvent, EventCallback, Page, Result};
use super::limiter::RateLimiter;

pub struct Paginator {
    limiter: RateLimiter,
    page_size: u32,
    events: Option<EventCallback>,
}

impl Paginator {
    pub fn new(limiter: RateLimiter, page_size: u32) -> Self {
        Self {
            limiter,
            page_size: page_size.max(1),
            events: None,
        }
    }

    pub fn with_events(mut self, callback: EventCallback) -> Self {
        self.events = Some(callback);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn fetch_page<L: Lister>(
        &self,
        label: &str,
        lister: &L,
        start_index: u32,
    ) -> Result<Page<L::Item>> {
        let page_size = self.page_size;
        let result = self
            .limiter
            .schedule(|| lister.list_page(start_index, page_size))
            .await;

        match result {
            Ok(page) => {
                info!(
                    batch = label,
                    start_index,
                    count = page.len(),
                    total_count = page.total_count,
                    "Fetched page"
                );
                emit(
                    &self.events,
                    BatchEvent::PageFetched {
                        label: label.to_string(),
                        start_index,
                        count: page.len(),
                        total_count: page.total_count,
                    },
                );
                Ok(page)
            }
            Err(e) => {
                error!(batch = label, start_index, error = %e, "Error fetching page");
                Err(e)
            }
        }
    }

    /// Read the whole collection by advancing the offset one page at a time
    ///
    /// Stops on a short or empty page, or once the reported `total_count`
    /// items are accumulated. Without a reported total only page length counts.
    pub async fn fetch_all<L: Lister>(&self, label: &str, lister: &L) -> Result<Vec<L::Item>> {
        let mut items = Vec::new();
        let mut start_index = 0u32;

        loop {
            let page = self.fetch_page(label, lister, start_index).await?;
            let count = page.len();
            let total_count = page.total_count;
            items.extend(page.items);
            start_index += self.page_size;

            let reached_total = total_count.is_some_and(|total| items.len() >= total as usize);
            if count == 0 || count < self.page_size as usize || reached_total {
                break;
            }
        }

        info!(batch = label, total = items.len(), "Fetched all items");
        Ok(items)
    }

    /// Poll the head of a shrinking collection
    pub fn drain<'a, L: Lister>(&'a self, label: &'a str, lister: &'a L) -> Drain<'a, L> {
        Drain {
            paginator: self,
            lister,
            label,
            offset: 0,
            done: false,
            fetched: 0,
            polls: 0,
        }
    }
}

/// Cursor over a collection whose processed items disappear remotely
///
/// Call [`Drain::retain`] after handling each page with the number of its
/// items that are still present remotely (skipped or failed); later polls
/// start past them so they are not handed out again.
pub struct Drain<'a, L: Lister> {
    paginator: &'a Paginator,
    lister: &'a L,
    label: &'a str,
    offset: u32,
    done: bool,
    fetched: u64,
    polls: u32,
}

impl<'a, L: Lister> Drain<'a, L> {
    /// Fetch the next unprocessed page, or `None` once the collection is exhausted
    pub async fn next_page(&mut self) -> Result<Option<Vec<L::Item>>> {
        if self.done {
            return Ok(None);
        }

        let page = self
            .paginator
            .fetch_page(self.label, self.lister, self.offset)
            .await?;
        self.polls += 1;

        let count = page.len();
        if count == 0 {
            debug!(batch = self.label, "Collection drained");
            self.done = true;
            return Ok(None);
        }
        if count < self.paginator.page_size as usize {
            self.done = true;
        }

        self.fetched += count as u64;
        Ok(Some(page.items))
    }

    /// Record how many items of the last page remain in the collection
    pub fn retain(&mut self, retained: usize) {
        self.offset += retained as u32;
    }

    /// Offset the next poll starts at
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Start polling from the head again
    pub fn restart(&mut self) {
        debug!(batch = self.label, offset = self.offset, "Restarting from the head");
        self.offset = 0;
        self.done = false;
    }

    pub fn fetched(&self) -> u64 {
        self.fetched
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }
}
