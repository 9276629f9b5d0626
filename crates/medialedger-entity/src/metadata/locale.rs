//! Normalized locale tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medialedger_core::AppError;

/// Longest tag accepted; matches the width of the `locale` column.
pub const MAX_LOCALE_LEN: usize = 16;

/// A locale tag normalized to `language[_Script][_REGION]` form.
///
/// Input is trimmed, `-` and `_` are both accepted as separators, the
/// language subtag is lowercased, four-letter script subtags are
/// title-cased and region subtags are uppercased. `" es-es "` and
/// `"es_ES"` therefore produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Sanitize and normalize a raw locale string.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Locale must not be empty"));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::validation(format!(
                "Invalid locale: '{trimmed}'. Only letters, digits, '-' and '_' are allowed"
            )));
        }

        let mut parts = Vec::new();
        for (idx, subtag) in trimmed.split(['-', '_']).enumerate() {
            if subtag.is_empty() {
                return Err(AppError::validation(format!(
                    "Invalid locale: '{trimmed}'. Empty subtag"
                )));
            }
            parts.push(normalize_subtag(idx, subtag));
        }

        let normalized = parts.join("_");
        if normalized.len() > MAX_LOCALE_LEN {
            return Err(AppError::validation(format!(
                "Invalid locale: '{trimmed}'. Longer than {MAX_LOCALE_LEN} characters"
            )));
        }
        Ok(Self(normalized))
    }

    /// Return the normalized tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag.
    pub fn language(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }
}

fn normalize_subtag(idx: usize, subtag: &str) -> String {
    if idx == 0 {
        return subtag.to_ascii_lowercase();
    }
    let is_alpha = subtag.chars().all(|c| c.is_ascii_alphabetic());
    match subtag.len() {
        2 if is_alpha => subtag.to_ascii_uppercase(),
        4 if is_alpha => {
            let lower = subtag.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => lower,
            }
        }
        _ => subtag.to_ascii_lowercase(),
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}
