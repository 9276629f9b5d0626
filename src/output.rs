//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use medialedger_entity::metadata::VersionRecord;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Display row for one version record.
#[derive(Debug, Serialize, Tabled)]
pub struct VersionRow {
    /// Version number
    version: u32,
    /// Field
    field: String,
    /// Source
    source: String,
    /// Value
    value: String,
    /// Checksum prefix
    checksum: String,
    /// Created at
    created_at: String,
}

impl From<&VersionRecord> for VersionRow {
    fn from(record: &VersionRecord) -> Self {
        Self {
            version: record.version,
            field: record.field.to_string(),
            source: record.source.to_string(),
            value: truncate(&record.value, 60),
            checksum: record.checksum.as_str().chars().take(12).collect(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Print version records, full values in JSON mode.
pub fn print_versions(records: &[VersionRecord], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let rows: Vec<VersionRow> = records.iter().map(VersionRow::from).collect();
            print_list(&rows, format);
        }
        OutputFormat::Json => print_json(records),
    }
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "null".to_string());
    println!("{}", json);
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

/// Shorten `value` to at most `max` characters for table cells.
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut short: String = value.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}
