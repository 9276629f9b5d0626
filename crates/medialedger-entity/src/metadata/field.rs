//! Metadata field enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medialedger_core::AppError;

/// The closed set of text attributes versioned per media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataField {
    /// Media title.
    Title,
    /// Alternate text.
    Alt,
    /// Caption.
    Caption,
    /// Long description.
    Description,
}

impl MetadataField {
    /// Every field, in the order diffs and reports list them.
    pub const ALL: [MetadataField; 4] = [Self::Title, Self::Alt, Self::Caption, Self::Description];

    /// Return the field as the lowercase name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Alt => "alt",
            Self::Caption => "caption",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetadataField {
    type Err = AppError;

    /// Parsing is exact: stored values are lowercase and anything else is
    /// not a member of the set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "alt" => Ok(Self::Alt),
            "caption" => Ok(Self::Caption),
            "description" => Ok(Self::Description),
            _ => Err(AppError::validation(format!(
                "Invalid field: '{s}'. Expected one of: title, alt, caption, description"
            ))),
        }
    }
}

impl TryFrom<String> for MetadataField {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
