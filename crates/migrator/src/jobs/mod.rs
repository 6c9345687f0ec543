//! Batch jobs, one per CLI subcommand
//!
//! Every job in a process shares one [`RateLimiter`] through its
//! [`JobContext`], so all remote calls are spaced the same way whichever
//! job issues them.

pub mod templates;
pub mod delete_catalog;
pub mod seed_catalog;
pub mod documents;
pub mod sandbox;

use tracing::info;

use crate::api::KiboClient;
use crate::config::MigrateConfig;
use crate::driver::{
    BatchConfig, BatchExecutor, BatchReport, DependencyResolver, EventCallback, Paginator,
    RateLimiter, Result,
};

/// Shared state for running jobs
pub struct JobContext {
    pub config: MigrateConfig,
    pub batch: BatchConfig,
    limiter: RateLimiter,
    events: Option<EventCallback>,
}

impl JobContext {
    pub fn new(config: MigrateConfig, batch: BatchConfig) -> Self {
        let limiter = RateLimiter::new(batch.min_time);
        Self {
            config,
            batch,
            limiter,
            events: None,
        }
    }

    /// Forward driver progress events to `callback`
    pub fn with_events(mut self, callback: EventCallback) -> Self {
        self.events = Some(callback);
        self
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn executor(&self) -> BatchExecutor {
        let executor = BatchExecutor::new(self.limiter.clone());
        match &self.events {
            Some(callback) => executor.with_events(callback.clone()),
            None => executor,
        }
    }

    pub fn paginator(&self) -> Paginator {
        let paginator = Paginator::new(self.limiter.clone(), self.batch.page_size);
        match &self.events {
            Some(callback) => paginator.with_events(callback.clone()),
            None => paginator,
        }
    }

    pub fn resolver<'e>(&self, executor: &'e BatchExecutor) -> DependencyResolver<'e> {
        DependencyResolver::new(executor, self.batch.strategy)
    }

    /// Client for the configured tenant and site
    pub fn source_client(&self) -> Result<KiboClient> {
        KiboClient::new(self.config.api.clone())
    }

    /// Client without site or child catalog headers
    pub fn master_catalog_client(&self) -> Result<KiboClient> {
        KiboClient::new(self.config.api.for_master_catalog())
    }

    /// Client for the tenant documents are copied into
    pub fn destination_client(&self) -> Result<KiboClient> {
        KiboClient::new(self.config.for_destination()?)
    }
}

/// The batch jobs the tool can run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    DeleteCatalog,
    SeedCatalog,
    CopyDocuments,
    CreateDocuments,
    CreateDocumentType,
    CreateDocumentList,
    ViewDocument { list_name: String, document_id: String },
    ListAttributes,
    ListChannels,
    CreateChannels,
}

impl Job {
    /// Stable name, also used for the log file
    pub fn name(&self) -> &'static str {
        match self {
            Job::DeleteCatalog => "delete-catalog",
            Job::SeedCatalog => "seed-catalog",
            Job::CopyDocuments => "copy-documents",
            Job::CreateDocuments => "create-documents",
            Job::CreateDocumentType => "create-document-type",
            Job::CreateDocumentList => "create-document-list",
            Job::ViewDocument { .. } => "view-document",
            Job::ListAttributes => "list-attributes",
            Job::ListChannels => "list-channels",
            Job::CreateChannels => "create-channels",
        }
    }

    /// Run the job to completion
    ///
    /// `Err` means the job was aborted; failures of single items are only
    /// reported in the returned batch reports.
    pub async fn run(&self, ctx: &JobContext) -> Result<Vec<BatchReport>> {
        info!(job = self.name(), "Starting job");

        let reports = match self {
            Job::DeleteCatalog => delete_catalog::delete_catalog(ctx).await?,
            Job::SeedCatalog => seed_catalog::seed_catalog(ctx).await?,
            Job::CopyDocuments => vec![documents::copy_documents(ctx).await?],
            Job::CreateDocuments => documents::create_documents(ctx).await?,
            Job::CreateDocumentType => vec![documents::create_document_type(ctx).await?],
            Job::CreateDocumentList => vec![documents::create_document_list(ctx).await?],
            Job::ViewDocument {
                list_name,
                document_id,
            } => vec![documents::view_document(ctx, list_name, document_id).await?],
            Job::ListAttributes => {
                sandbox::list_attributes(ctx).await?;
                Vec::new()
            }
            Job::ListChannels => {
                sandbox::list_channels(ctx).await?;
                Vec::new()
            }
            Job::CreateChannels => vec![sandbox::create_channels(ctx).await?],
        };

        let failed: u64 = reports.iter().map(|r| r.outcome.failed).sum();
        info!(
            job = self.name(),
            batches = reports.len(),
            failed,
            "Job complete"
        );
        Ok(reports)
    }
}
