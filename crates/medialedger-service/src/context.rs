//! Edit context carrying the locale and bulk-operation scope of a change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medialedger_entity::metadata::Locale;

/// Automation runs during which edits must not be classified as manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    /// Batch regeneration by the content generator.
    AiRegeneration,
    /// Batch image optimization.
    BulkOptimize,
    /// A command-line maintenance run.
    CommandLine,
}

impl BulkOperation {
    /// Return the operation as a snake_case string for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiRegeneration => "ai_regeneration",
            Self::BulkOptimize => "bulk_optimize",
            Self::CommandLine => "command_line",
        }
    }
}

/// Context for one incoming edit notification.
///
/// Passed explicitly into every change detector so the suppression scope
/// of a bulk run is limited to the calls that carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditContext {
    /// Locale the edit applies to; detectors fall back to the configured
    /// default when unset.
    pub locale: Option<Locale>,
    /// Set while an automated batch is running.
    pub bulk: Option<BulkOperation>,
    /// Free-form identification of who made the edit, for logs.
    pub actor: Option<String>,
    /// When the notification was received.
    pub received_at: DateTime<Utc>,
}

impl EditContext {
    /// Context for an edit made interactively by a person.
    pub fn interactive() -> Self {
        Self {
            locale: None,
            bulk: None,
            actor: None,
            received_at: Utc::now(),
        }
    }

    /// Context for writes performed by an automated batch.
    pub fn bulk(operation: BulkOperation) -> Self {
        Self {
            bulk: Some(operation),
            ..Self::interactive()
        }
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Set the actor.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Returns whether manual-edit detection is suppressed.
    pub fn is_bulk(&self) -> bool {
        self.bulk.is_some()
    }

    /// The locale to record under.
    pub fn locale_or<'a>(&'a self, default: &'a Locale) -> &'a Locale {
        self.locale.as_ref().unwrap_or(default)
    }
}

impl Default for EditContext {
    fn default() -> Self {
        Self::interactive()
    }
}
