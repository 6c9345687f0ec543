//! Core types used throughout the batch driver
//!
//! Everything else in the driver depends on these: the page shape returned by
//! list endpoints, the item traits, errors, metrics and progress events.

pub mod error;
pub mod metrics;
pub mod progress;

pub use error::{MigrateError, Result};
pub use metrics::{BatchMetrics, BatchOutcome, BatchReport, ItemFailure};
pub use progress::{BatchEvent, EventCallback, SkipReason};

use serde::Deserialize;

/// One page of a remote collection
///
/// Mirrors the paged envelope every list endpoint returns. `items` may be
/// absent on an empty page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Absent when the endpoint does not report a total
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub start_index: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub page_count: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, start_index: u32, total_count: u32) -> Self {
        let page_size = items.len() as u32;
        Self {
            items,
            total_count: Some(total_count),
            start_index,
            page_size,
            page_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A remote record that a batch operates on
pub trait BatchItem {
    /// Identifying key used to target the item (id, code or FQN).
    /// Items without one are skipped before they reach the limiter.
    fn key(&self) -> Option<String>;

    /// Human-readable label for log lines
    fn display_name(&self) -> String;

    /// Name or code checked against a protected set before destructive operations
    fn protection_key(&self) -> Option<&str> {
        None
    }
}

/// An item that may reference a parent by name
pub trait HierarchicalItem: BatchItem {
    /// Identifier the remote system assigns on creation
    type Id: Clone + Send + std::fmt::Debug;

    /// Name other items use to reference this one
    fn name(&self) -> Option<&str>;

    fn parent_reference_name(&self) -> Option<&str>;

    /// Attach the resolved parent identifier before the create call
    fn attach_parent(&mut self, parent_id: Self::Id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_without_items_decodes_empty() {
        let page: Page<serde_json::Value> =
            serde_json::from_str(r#"{"startIndex":0,"pageSize":200,"totalCount":0}"#).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.page_size, 200);
        assert_eq!(page.total_count, Some(0));
    }

    #[test]
    fn page_decodes_camel_case_envelope() {
        let json = r#"{
            "startIndex": 200,
            "pageSize": 200,
            "pageCount": 3,
            "totalCount": 450,
            "items": [{"id": 1}, {"id": 2}]
        }"#;
        let page: Page<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.start_index, 200);
        assert_eq!(page.total_count, Some(450));
        assert_eq!(page.page_count, 3);
    }

    #[test]
    fn missing_total_count_stays_unknown() {
        let page: Page<serde_json::Value> =
            serde_json::from_str(r#"{"startIndex":0,"items":[{"id":1}]}"#).unwrap();
        assert_eq!(page.total_count, None);
        assert_eq!(page.len(), 1);
    }
}
