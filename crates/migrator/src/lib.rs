//! Migrator Library
//!
//! Bulk operations against a commerce tenant's REST API: emptying a catalog,
//! seeding one from JSON templates, copying content documents between
//! tenants and setting up sandbox channels. All jobs run through one
//! rate-limited, paginated batch driver.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use migrator::{BatchConfig, BatchEvent, Job, JobContext, MigrateConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> migrator::Result<()> {
//! // Read TENANT_ID, CLIENT_ID, SHARED_SECRET, ... from the environment
//! let config = MigrateConfig::from_env();
//!
//! // One request every 500ms, 200 items per page
//! let ctx = JobContext::new(config, BatchConfig::default()).with_events(Arc::new(
//!     |event: BatchEvent| {
//!         if let BatchEvent::BatchComplete { label, outcome } = event {
//!             println!("{}: {} of {} succeeded", label, outcome.succeeded, outcome.attempted);
//!         }
//!     },
//! ));
//!
//! let reports = Job::SeedCatalog.run(&ctx).await?;
//! let failed: u64 = reports.iter().map(|r| r.outcome.failed).sum();
//! println!("{} batches, {} failed items", reports.len(), failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Rate limiting**: every remote call in a process is spaced by a shared minimum interval
//! - **Pagination**: fetch-all and drain-from-head cursors over any listable resource
//! - **Per-item isolation**: one failed item never aborts the rest of its batch
//! - **Protected items**: system attributes and the base product type are never deleted
//! - **Dependency ordering**: categories are created parents-first with resolved parent ids
//! - **Structured logs**: console output plus a JSON log file per job

pub mod driver;
pub mod config;
pub mod logging;
pub mod api;
pub mod jobs;

// Re-export commonly used types for convenience
pub use driver::{
    BatchConfig, BatchEvent, BatchExecutor, BatchItem, BatchOutcome, BatchReport, EventCallback,
    MigrateError, Paginator, ProtectedSet, RateLimiter, ResolveStrategy, Result,
};
pub use config::{ApiConfig, MigrateConfig};
pub use logging::{init_logging, log_file_path};
pub use api::KiboClient;
pub use jobs::{Job, JobContext};
