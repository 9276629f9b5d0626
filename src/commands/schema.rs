//! Schema management commands.

use clap::{Args, Subcommand};

use medialedger_core::error::AppError;
use medialedger_service::VersioningService;

use crate::output;

/// Arguments for the schema command
#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Schema subcommand
    #[command(subcommand)]
    pub command: SchemaCommand,
}

/// Schema subcommands
#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Create the version table if it is missing or outdated
    Init,
    /// Check that the store is reachable
    Check,
}

/// Execute schema commands
pub async fn execute(args: &SchemaArgs, versioning: &VersioningService) -> Result<(), AppError> {
    match &args.command {
        SchemaCommand::Init => {
            if versioning.maybe_create_table().await? {
                output::print_success("Version table is ready.");
            } else {
                return Err(AppError::database("Version table could not be created"));
            }
        }
        SchemaCommand::Check => {
            if versioning.store().health_check().await? {
                output::print_success("Store is reachable.");
            } else {
                output::print_warning("Store responded unexpectedly.");
            }
        }
    }
    Ok(())
}
