//! CLI command definitions and dispatch.

pub mod policy;
pub mod purge;
pub mod schema;
pub mod version;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use medialedger_core::config::{AppConfig, StoreBackend};
use medialedger_core::error::AppError;
use medialedger_database::{
    DatabasePool, MemoryVersionStore, MetadataVersionRepository, VersionStore,
};
use medialedger_service::{RetryPolicy, VersioningService};

use crate::output::OutputFormat;

/// MediaLedger: metadata version history and manual-edit arbitration
#[derive(Debug, Parser)]
#[command(name = "medialedger", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to config/default + config/$MEDIALEDGER_ENV)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Schema management
    Schema(schema::SchemaArgs),
    /// Save a value as a new version
    Save(version::SaveArgs),
    /// List the version history of a field
    History(version::KeyArgs),
    /// Show the active or a specific version
    Show(version::ShowArgs),
    /// Compare two versions of a field
    Diff(version::DiffArgs),
    /// Latest automated vs latest manual value per field
    AiVsManual(policy::AiVsManualArgs),
    /// Check whether an automated writer may overwrite a field
    CanWrite(policy::CanWriteArgs),
    /// Remove all history of a deleted media item
    Purge(purge::PurgeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let versioning = build_versioning(config).await?;

        match &self.command {
            Commands::Schema(args) => schema::execute(args, &versioning).await,
            Commands::Save(args) => version::save(args, &versioning, self.format).await,
            Commands::History(args) => version::history(args, &versioning, self.format).await,
            Commands::Show(args) => version::show(args, &versioning, self.format).await,
            Commands::Diff(args) => version::diff(args, &versioning, self.format).await,
            Commands::AiVsManual(args) => {
                policy::ai_vs_manual(args, &versioning, self.format).await
            }
            Commands::CanWrite(args) => {
                policy::can_write(args, &versioning, config, self.format).await
            }
            Commands::Purge(args) => purge::execute(args, &versioning).await,
        }
    }
}

/// Helper: open the configured store and wrap it in the versioning service
pub async fn build_versioning(config: &AppConfig) -> Result<Arc<VersioningService>, AppError> {
    let store: Arc<dyn VersionStore> = match config.versioning.backend {
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            Arc::new(MetadataVersionRepository::new(pool.into_pool()))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; history is discarded on exit");
            Arc::new(MemoryVersionStore::new())
        }
    };

    let retry = RetryPolicy::from_config(&config.versioning);
    info!(
        backend = ?config.versioning.backend,
        max_attempts = retry.max_attempts,
        "Versioning store ready"
    );
    Ok(Arc::new(VersioningService::new(store, retry)))
}
