//! Capability traits for remote resources
//!
//! Each API resource implements only what it supports, so the paginator and
//! executor can drive any of them without knowing the concrete client.

use async_trait::async_trait;

use super::core::{Page, Result};

/// Paged read access to a collection
#[async_trait]
pub trait Lister: Send + Sync {
    type Item: Send;

    async fn list_page(&self, start_index: u32, page_size: u32) -> Result<Page<Self::Item>>;
}

/// Create one item from a draft
#[async_trait]
pub trait Creator<T: Sync + ?Sized>: Send + Sync {
    type Output: Send;

    async fn create(&self, item: &T) -> Result<Self::Output>;
}

/// Delete one item by key
#[async_trait]
pub trait Deleter<K: Sync + ?Sized>: Send + Sync {
    async fn delete(&self, key: &K) -> Result<()>;
}

/// Publish pending changes for the given keys
#[async_trait]
pub trait Publisher<K: Sync>: Send + Sync {
    async fn publish(&self, keys: &[K]) -> Result<()>;
}
