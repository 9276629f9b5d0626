//! History purge for deleted media items.

use clap::Args;

use medialedger_core::error::AppError;
use medialedger_entity::metadata::MediaId;
use medialedger_service::VersioningService;

use crate::output;

/// Arguments for the purge command
#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// Media item ID
    pub media_id: i64,
    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Execute the purge command
pub async fn execute(args: &PurgeArgs, versioning: &VersioningService) -> Result<(), AppError> {
    let media_id = MediaId::new(args.media_id)?;

    if !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!(
                "This permanently deletes every version of media item {media_id}. Continue?"
            ))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = versioning.purge_media(media_id).await?;
    output::print_success(&format!(
        "Removed {removed} version(s) of media item {media_id}"
    ));
    Ok(())
}
