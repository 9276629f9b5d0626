//! Metadata source (origin) enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medialedger_core::AppError;

/// Who produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    /// The automated generator.
    Ai,
    /// A human editor.
    Manual,
    /// A template default.
    Template,
}

impl MetadataSource {
    /// Return the source as the lowercase name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Manual => "manual",
            Self::Template => "template",
        }
    }

    /// Check if this value was entered by a human.
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }

    /// Check if this value came from the automated generator.
    pub fn is_ai(&self) -> bool {
        matches!(self, Self::Ai)
    }
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetadataSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai" => Ok(Self::Ai),
            "manual" => Ok(Self::Manual),
            "template" => Ok(Self::Template),
            _ => Err(AppError::validation(format!(
                "Invalid source: '{s}'. Expected one of: ai, manual, template"
            ))),
        }
    }
}

impl TryFrom<String> for MetadataSource {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
