use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{EntryId, RecordStatus, RequirementLevel};

/// True if a calendar expiration date has passed at `now`.
///
/// The date is taken as midnight UTC at the start of that day.
#[must_use]
pub fn is_expired(expiration_date: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
    match expiration_date {
        Some(date) => date.and_time(chrono::NaiveTime::MIN).and_utc() < now,
        None => false,
    }
}

/// A license held by a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLicense {
    #[serde(default)]
    pub canonical_license_id: Option<EntryId>,

    #[serde(default)]
    pub state: Option<String>,

    /// Multi-state reciprocity
    #[serde(default)]
    pub is_compact: bool,

    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

impl CandidateLicense {
    pub fn new(canonical_license_id: impl Into<String>) -> Self {
        Self {
            canonical_license_id: Some(EntryId::new(canonical_license_id)),
            state: None,
            is_compact: false,
            expiration_date: None,
        }
    }

    /// A license whose type could not be resolved
    pub fn unresolved() -> Self {
        Self {
            canonical_license_id: None,
            state: None,
            is_compact: false,
            expiration_date: None,
        }
    }

    #[must_use]
    pub fn in_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn compact(mut self) -> Self {
        self.is_compact = true;
        self
    }

    #[must_use]
    pub fn expiring(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    /// Resolved and not expired at `now`
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.canonical_license_id.is_some() && !is_expired(self.expiration_date, now)
    }
}

/// A certification held by a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCertification {
    #[serde(default)]
    pub canonical_certification_id: Option<EntryId>,

    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

impl CandidateCertification {
    pub fn new(canonical_certification_id: impl Into<String>) -> Self {
        Self {
            canonical_certification_id: Some(EntryId::new(canonical_certification_id)),
            expiration_date: None,
        }
    }

    #[must_use]
    pub fn expiring(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }

    /// Resolved and not expired at `now`
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.canonical_certification_id.is_some() && !is_expired(self.expiration_date, now)
    }
}

/// A license a requisition asks for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRequirement {
    #[serde(default)]
    pub canonical_license_id: Option<EntryId>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub requirement_level: RequirementLevel,
}

impl LicenseRequirement {
    pub fn required(canonical_license_id: impl Into<String>) -> Self {
        Self {
            canonical_license_id: Some(EntryId::new(canonical_license_id)),
            state: None,
            requirement_level: RequirementLevel::Required,
        }
    }

    pub fn preferred(canonical_license_id: impl Into<String>) -> Self {
        Self {
            requirement_level: RequirementLevel::Preferred,
            ..Self::required(canonical_license_id)
        }
    }

    /// A required license whose raw name never resolved
    pub fn unresolved() -> Self {
        Self {
            canonical_license_id: None,
            state: None,
            requirement_level: RequirementLevel::Required,
        }
    }
}

/// A certification a requisition asks for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationRequirement {
    #[serde(default)]
    pub canonical_certification_id: Option<EntryId>,

    #[serde(default)]
    pub requirement_level: RequirementLevel,
}

impl CertificationRequirement {
    pub fn required(canonical_certification_id: impl Into<String>) -> Self {
        Self {
            canonical_certification_id: Some(EntryId::new(canonical_certification_id)),
            requirement_level: RequirementLevel::Required,
        }
    }

    pub fn preferred(canonical_certification_id: impl Into<String>) -> Self {
        Self {
            requirement_level: RequirementLevel::Preferred,
            ..Self::required(canonical_certification_id)
        }
    }
}

/// A healthcare worker with their resolved credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub status: RecordStatus,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub canonical_job_title_id: Option<EntryId>,

    #[serde(default)]
    pub licenses: Vec<CandidateLicense>,

    #[serde(default)]
    pub certifications: Vec<CandidateCertification>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            status: RecordStatus::Active,
            state: None,
            canonical_job_title_id: None,
            licenses: Vec::new(),
            certifications: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_job_title(mut self, id: impl Into<String>) -> Self {
        self.canonical_job_title_id = Some(EntryId::new(id));
        self
    }

    #[must_use]
    pub fn with_license(mut self, license: CandidateLicense) -> Self {
        self.licenses.push(license);
        self
    }

    #[must_use]
    pub fn with_certification(mut self, certification: CandidateCertification) -> Self {
        self.certifications.push(certification);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A job opening with its resolved requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requisition {
    pub id: String,

    /// Raw job title as written on the requisition
    #[serde(default)]
    pub job_title: String,

    #[serde(default)]
    pub raw_facility_name: Option<String>,

    #[serde(default)]
    pub status: RecordStatus,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub canonical_job_title_id: Option<EntryId>,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub licenses: Vec<LicenseRequirement>,

    #[serde(default)]
    pub certifications: Vec<CertificationRequirement>,
}

impl Requisition {
    pub fn new(id: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job_title: job_title.into(),
            raw_facility_name: None,
            status: RecordStatus::Active,
            state: None,
            canonical_job_title_id: None,
            expires_at: None,
            licenses: Vec::new(),
            certifications: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_job_title_id(mut self, id: impl Into<String>) -> Self {
        self.canonical_job_title_id = Some(EntryId::new(id));
        self
    }

    #[must_use]
    pub fn in_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn with_license(mut self, requirement: LicenseRequirement) -> Self {
        self.licenses.push(requirement);
        self
    }

    #[must_use]
    pub fn with_certification(mut self, requirement: CertificationRequirement) -> Self {
        self.certifications.push(requirement);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Still open at `now`
    #[must_use]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_expired() {
        let now = noon(2025, 6, 15);
        assert!(!is_expired(None, now));
        assert!(is_expired(Some(date(2025, 6, 14)), now));
        // Same calendar day counts as expired once midnight UTC has passed
        assert!(is_expired(Some(date(2025, 6, 15)), now));
        assert!(!is_expired(Some(date(2025, 6, 16)), now));
    }

    #[test]
    fn test_license_validity_requires_canonical_id() {
        let now = noon(2025, 1, 1);
        assert!(CandidateLicense::new("rn").is_valid_at(now));
        assert!(!CandidateLicense::unresolved().is_valid_at(now));
        assert!(!CandidateLicense::new("rn")
            .expiring(date(2024, 12, 31))
            .is_valid_at(now));
    }

    #[test]
    fn test_candidate_deserializes_with_defaults() {
        let json = r#"{
            "id": "c1",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "licenses": [{"canonical_license_id": "rn", "state": "TX", "expiration_date": "2030-01-01"}]
        }"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.status, RecordStatus::Active);
        assert_eq!(candidate.display_name(), "Ada Lovelace");
        assert_eq!(candidate.licenses.len(), 1);
        assert!(!candidate.licenses[0].is_compact);
        assert_eq!(candidate.licenses[0].expiration_date, Some(date(2030, 1, 1)));
    }

    #[test]
    fn test_requisition_is_open() {
        let now = noon(2025, 3, 1);
        let req = Requisition::new("r1", "ICU RN");
        assert!(req.is_open_at(now));
        assert!(!req.clone().expiring_at(noon(2025, 2, 1)).is_open_at(now));
        assert!(req.expiring_at(noon(2025, 4, 1)).is_open_at(now));
    }
}
