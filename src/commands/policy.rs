//! Write arbitration commands.

use std::sync::Arc;

use async_trait::async_trait;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use medialedger_core::config::AppConfig;
use medialedger_core::error::AppError;
use medialedger_core::result::AppResult;
use medialedger_entity::metadata::{Locale, MediaId, MetadataField, MetadataSource, VersionRecord};
use medialedger_service::{AttachmentText, ManualEditProtection, MediaLibrary, VersioningService};

use crate::output::{self, OutputFormat};

/// Arguments for the ai-vs-manual command
#[derive(Debug, Args)]
pub struct AiVsManualArgs {
    /// Media item ID
    pub media_id: i64,
    /// Locale tag
    pub locale: String,
}

/// Arguments for the can-write command
#[derive(Debug, Args)]
pub struct CanWriteArgs {
    /// Media item ID
    pub media_id: i64,
    /// Locale tag
    pub locale: String,
    /// Field: title, alt, caption or description
    pub field: String,
    /// Evaluate as a forced replacement
    #[arg(long)]
    pub force: bool,
}

/// One field of the ai-vs-manual report
#[derive(Debug, Serialize, Tabled)]
struct FieldDiffRow {
    /// Field
    field: String,
    /// Active version
    active: u32,
    /// Active source
    source: String,
    /// Latest ai version
    ai: String,
    /// Latest manual version
    manual: String,
    /// Manual is active
    manual_is_active: bool,
}

/// Policy queries from the command line have no host library behind them.
struct DetachedLibrary;

#[async_trait]
impl MediaLibrary for DetachedLibrary {
    async fn is_media_item(&self, _object_id: i64) -> AppResult<bool> {
        Ok(false)
    }

    async fn attachment_text(&self, _media_id: MediaId) -> AppResult<Option<AttachmentText>> {
        Ok(None)
    }

    async fn record_source_marker(
        &self,
        _media_id: MediaId,
        _field: MetadataField,
        _source: MetadataSource,
        _version: u32,
    ) -> AppResult<()> {
        Ok(())
    }
}

/// Report latest automated vs latest manual per field
pub async fn ai_vs_manual(
    args: &AiVsManualArgs,
    versioning: &VersioningService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let media_id = MediaId::new(args.media_id)?;
    let locale = Locale::parse(&args.locale)?;
    let diffs = versioning.get_ai_vs_manual_diff(media_id, &locale).await?;

    match format {
        OutputFormat::Json => output::print_json(&diffs),
        OutputFormat::Table => {
            let version_of = |r: &Option<VersionRecord>| {
                r.as_ref()
                    .map(|r| r.version.to_string())
                    .unwrap_or_else(|| "-".to_string())
            };
            let rows: Vec<FieldDiffRow> = diffs
                .iter()
                .map(|(field, d)| FieldDiffRow {
                    field: field.to_string(),
                    active: d.active.version,
                    source: d.active.source.to_string(),
                    ai: version_of(&d.ai),
                    manual: version_of(&d.manual),
                    manual_is_active: d.manual_is_active,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

/// Evaluate the arbitration policy for one field
pub async fn can_write(
    args: &CanWriteArgs,
    versioning: &Arc<VersioningService>,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let media_id = MediaId::new(args.media_id)?;
    let locale = Locale::parse(&args.locale)?;
    let field: MetadataField = args.field.parse()?;

    let protection = ManualEditProtection::new(
        Arc::clone(versioning),
        Arc::new(DetachedLibrary),
        Locale::parse(&config.versioning.default_locale)?,
    );
    let has_manual = protection.has_manual_edit(media_id, field, &locale).await?;
    let allowed = protection
        .can_ai_write(media_id, field, &locale, args.force)
        .await?;

    match format {
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "media_id": media_id,
            "locale": locale,
            "field": field,
            "has_manual_edit": has_manual,
            "force_replace": args.force,
            "can_ai_write": allowed,
        })),
        OutputFormat::Table => {
            output::print_kv("Manual edit active", &has_manual.to_string());
            if allowed {
                output::print_success("Automated writers may overwrite this field.");
            } else {
                output::print_warning("A manual value is active; automated writes are blocked.");
            }
        }
    }
    Ok(())
}
