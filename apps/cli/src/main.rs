//! Migrate - bulk jobs against a commerce tenant
//!
//! Commands:
//! - `migrate delete-catalog` - Empty the catalog
//! - `migrate seed-catalog` - Create attributes, product types and categories from templates
//! - `migrate copy-documents` - Copy a document list into another tenant
//! - `migrate create-documents` - Create and publish templated documents
//! - `migrate view-document` - Show one document's messages
//! - `migrate list-channels` / `migrate create-channels` - Sandbox channel setup

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use migrator::{BatchConfig, Job, JobContext, MigrateConfig, init_logging};

/// Bulk migration and seeding jobs for a commerce tenant
///
/// Connection settings are read from the environment and `.env`.
#[derive(Parser)]
#[command(name = "migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete products, categories, product types and attributes
    DeleteCatalog,

    /// Create attributes, product types and categories from DATA_DIR
    SeedCatalog,

    /// Copy every document of DOCUMENT_LIST_NAME to DEST_TENANT_ID
    CopyDocuments,

    /// Create and publish the documents in documentTemplate.json
    CreateDocuments,

    /// Create the document type in documentTypeTemplate.json
    CreateDocumentType,

    /// Create the document list in documentListTemplate.json
    CreateDocumentList,

    /// Fetch one document and log its messages
    ViewDocument {
        /// Fully qualified list name, e.g. banners@mystore
        list: String,
        /// Document id
        id: String,
    },

    /// Log every attribute definition
    ListAttributes,

    /// Log every channel
    ListChannels,

    /// Create the default online, phone and crm channels
    CreateChannels,
}

impl From<Commands> for Job {
    fn from(command: Commands) -> Self {
        match command {
            Commands::DeleteCatalog => Job::DeleteCatalog,
            Commands::SeedCatalog => Job::SeedCatalog,
            Commands::CopyDocuments => Job::CopyDocuments,
            Commands::CreateDocuments => Job::CreateDocuments,
            Commands::CreateDocumentType => Job::CreateDocumentType,
            Commands::CreateDocumentList => Job::CreateDocumentList,
            Commands::ViewDocument { list, id } => Job::ViewDocument {
                list_name: list,
                document_id: id,
            },
            Commands::ListAttributes => Job::ListAttributes,
            Commands::ListChannels => Job::ListChannels,
            Commands::CreateChannels => Job::CreateChannels,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let job = Job::from(cli.command);

    let config = MigrateConfig::from_env();
    let log_file = init_logging(job.name(), &config.log_level, &config.log_dir)?;
    info!(log_file = %log_file.display(), "Logging initialized");

    let ctx = JobContext::new(config, BatchConfig::default());
    if let Err(e) = job.run(&ctx).await {
        error!(
            job = job.name(),
            category = e.category(),
            suggestion = e.suggestion().unwrap_or("-"),
            error = %e,
            "Job aborted"
        );
        std::process::exit(1);
    }

    Ok(())
}
