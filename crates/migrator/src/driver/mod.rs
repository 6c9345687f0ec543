//! Bulk batch driver
//!
//! Rate limiter, paginator, dependency resolver and executor shared by every
//! migration job.

pub mod core;
pub mod config;
pub mod capability;
pub mod limiter;
pub mod paginator;
pub mod protect;
pub mod batch;
pub mod resolver;

pub use core::{
    BatchEvent, BatchItem, BatchMetrics, BatchOutcome, BatchReport, EventCallback,
    HierarchicalItem, ItemFailure, MigrateError, Page, Result, SkipReason,
};
pub use config::{BatchConfig, ResolveStrategy};
pub use capability::{Creator, Deleter, Lister, Publisher};
pub use limiter::RateLimiter;
pub use paginator::{Drain, Paginator};
pub use protect::{ProtectedSet, BASE_PRODUCT_TYPE, SYSTEM_ATTRIBUTE_CODES};
pub use batch::{BatchExecutor, BatchRun, ItemOutcome, PageOrder};
pub use resolver::{DependencyResolver, ParentIndex, topological_order};
