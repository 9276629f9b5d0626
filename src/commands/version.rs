//! Version read and write commands.

use clap::Args;

use medialedger_core::error::AppError;
use medialedger_entity::metadata::{SaveOutcome, VersionKey};
use medialedger_service::VersioningService;

use crate::output::{self, OutputFormat};

/// Identifies one version history
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Media item ID
    pub media_id: i64,
    /// Locale tag (e.g. en, es_ES)
    pub locale: String,
    /// Field: title, alt, caption or description
    pub field: String,
}

impl KeyArgs {
    fn key(&self) -> Result<VersionKey, AppError> {
        VersionKey::parse(self.media_id, &self.locale, &self.field)
    }
}

/// Arguments for the save command
#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Target history
    #[command(flatten)]
    pub key: KeyArgs,
    /// New value (may be empty)
    pub value: String,
    /// Origin of the value: ai, manual or template
    #[arg(short, long, default_value = "manual")]
    pub source: String,
}

/// Arguments for the show command
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Target history
    #[command(flatten)]
    pub key: KeyArgs,
    /// Version number (defaults to the active version)
    #[arg(short, long)]
    pub version: Option<u32>,
}

/// Arguments for the diff command
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Target history
    #[command(flatten)]
    pub key: KeyArgs,
    /// First version
    pub version_a: u32,
    /// Second version
    pub version_b: u32,
}

/// Save a value
pub async fn save(
    args: &SaveArgs,
    versioning: &VersioningService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let outcome = versioning
        .save_raw(
            args.key.media_id,
            &args.key.locale,
            &args.key.field,
            &args.value,
            &args.source,
        )
        .await?;

    match (format, &outcome) {
        (OutputFormat::Json, _) => output::print_json(&outcome),
        (OutputFormat::Table, SaveOutcome::Created(record)) => {
            output::print_success(&format!(
                "Saved {} as version {}",
                record.key(),
                record.version
            ));
        }
        (OutputFormat::Table, SaveOutcome::Unchanged { version }) => {
            output::print_warning(&format!("Value unchanged; version {version} stays active"));
        }
    }
    Ok(())
}

/// List history, newest first
pub async fn history(
    args: &KeyArgs,
    versioning: &VersioningService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let records = versioning.get_version_history(&args.key()?).await?;
    output::print_versions(&records, format);
    Ok(())
}

/// Show one version
pub async fn show(
    args: &ShowArgs,
    versioning: &VersioningService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let key = args.key.key()?;
    let record = match args.version {
        Some(version) => versioning.get_version(&key, version).await?,
        None => versioning.get_active_version(&key).await?,
    };
    let record = record.ok_or_else(|| match args.version {
        Some(version) => AppError::not_found(format!("Version {version} of {key} not found")),
        None => AppError::not_found(format!("No versions recorded for {key}")),
    })?;

    match format {
        OutputFormat::Json => output::print_json(&record),
        OutputFormat::Table => {
            output::print_kv("Key", &key.to_string());
            output::print_kv("Version", &record.version.to_string());
            output::print_kv("Source", record.source.as_str());
            output::print_kv("Checksum", record.checksum.as_str());
            output::print_kv("Created", &record.created_at.to_rfc3339());
            output::print_kv("Value", &record.value);
        }
    }
    Ok(())
}

/// Compare two versions
pub async fn diff(
    args: &DiffArgs,
    versioning: &VersioningService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let key = args.key.key()?;
    let diff = versioning
        .compare_versions(&key, args.version_a, args.version_b)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Versions {} and {} of {key} are not both present",
                args.version_a, args.version_b
            ))
        })?;

    match format {
        OutputFormat::Json => output::print_json(&diff),
        OutputFormat::Table => {
            output::print_kv("Key", &key.to_string());
            output::print_kv("Values match", &diff.values_match.to_string());
            output::print_kv("Source changed", &diff.source_changed.to_string());
            output::print_kv(
                "Sources",
                &format!("{} -> {}", diff.version_a.source, diff.version_b.source),
            );
            if let Some(change) = &diff.value_diff {
                output::print_kv("From", &change.from);
                output::print_kv("To", &change.to);
            }
        }
    }
    Ok(())
}
