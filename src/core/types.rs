use serde::{Deserialize, Serialize};

/// Identifier of a canonical entry (facility, license type, certification type or job title)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The domain a raw value is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalKey {
    FacilityName,
    LicenseType,
    CertType,
    JobTitle,
}

impl CanonicalKey {
    pub const ALL: [CanonicalKey; 4] = [
        Self::FacilityName,
        Self::LicenseType,
        Self::CertType,
        Self::JobTitle,
    ];

    /// Short description of the domain, handed to the semantic matcher as a hint
    #[must_use]
    pub fn domain_hint(self) -> &'static str {
        match self {
            Self::FacilityName => "healthcare facility or hospital",
            Self::LicenseType => "professional medical/nursing license",
            Self::CertType => "healthcare certification",
            Self::JobTitle => "healthcare job title or position",
        }
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FacilityName => write!(f, "facilityName"),
            Self::LicenseType => write!(f, "licenseType"),
            Self::CertType => write!(f, "certType"),
            Self::JobTitle => write!(f, "jobTitle"),
        }
    }
}

/// How a canonical id was assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Case-insensitive equality on abbreviation, name or alias
    Exact,
    /// Edit-distance similarity above the fuzzy threshold
    Fuzzy,
    /// Selected by the semantic matcher
    Ai,
    /// Assigned by an administrator; never produced by the resolver
    Manual,
    /// Unresolved
    None,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Fuzzy => write!(f, "fuzzy"),
            Self::Ai => write!(f, "ai"),
            Self::Manual => write!(f, "manual"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Whether a requisition's credential need is mandatory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequirementLevel {
    #[default]
    Required,
    Preferred,
}

/// Review status shared by candidates and requisitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    PendingReview,
    #[default]
    Active,
    Archived,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PendingReview => write!(f, "pending_review"),
            Self::Active => write!(f, "active"),
            Self::Archived => write!(f, "archived"),
        }
    }
}
