use serde::{Deserialize, Serialize};

use crate::core::types::{CanonicalKey, EntryId, MatchType};

/// Which field of a canonical entry a raw value was compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonField {
    Name,
    Abbreviation,
    Alias,
}

impl std::fmt::Display for ComparisonField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Abbreviation => write!(f, "abbreviation"),
            Self::Alias => write!(f, "alias"),
        }
    }
}

/// A normalized reference record that raw strings are mapped onto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    /// Stable identifier
    pub id: EntryId,

    /// Canonical display string
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,

    /// Alternate spellings, in priority order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl CanonicalEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(id),
            name: name.into(),
            abbreviation: None,
            aliases: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// All strings a raw value may be compared against: name, abbreviation, then aliases.
    /// Empty abbreviations are skipped.
    pub fn comparison_strings(&self) -> impl Iterator<Item = (ComparisonField, &str)> {
        std::iter::once((ComparisonField::Name, self.name.as_str()))
            .chain(
                self.abbreviation
                    .as_deref()
                    .filter(|a| !a.is_empty())
                    .map(|a| (ComparisonField::Abbreviation, a)),
            )
            .chain(
                self.aliases
                    .iter()
                    .map(|a| (ComparisonField::Alias, a.as_str())),
            )
    }
}

/// Outcome of one resolution attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResult {
    pub key: CanonicalKey,
    pub raw_value: String,
    pub canonical_id: Option<EntryId>,
    pub canonical_value: Option<String>,
    pub match_type: MatchType,
    /// 0.0 - 1.0
    pub confidence: f64,
    /// Which rule fired
    pub reason: String,
}

impl CanonicalResult {
    /// An unresolved result
    pub fn none(key: CanonicalKey, raw_value: &str, reason: impl Into<String>) -> Self {
        Self {
            key,
            raw_value: raw_value.to_string(),
            canonical_id: None,
            canonical_value: None,
            match_type: MatchType::None,
            confidence: 0.0,
            reason: reason.into(),
        }
    }

    /// A result pointing at `entry`
    pub fn matched(
        key: CanonicalKey,
        raw_value: &str,
        entry: &CanonicalEntry,
        match_type: MatchType,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            key,
            raw_value: raw_value.to_string(),
            canonical_id: Some(entry.id.clone()),
            canonical_value: Some(entry.name.clone()),
            match_type,
            confidence,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.canonical_id.is_some()
    }
}
