use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::record::{Candidate, CandidateLicense, Requisition};
use crate::core::types::{EntryId, RequirementLevel};
use crate::utils::states::same_state;

/// Safely convert usize to f64 for percentage calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Round a 0-100 value to the nearest whole percent
#[inline]
fn to_percent(value: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.round().clamp(0.0, 100.0) as u8
    }
}

fn ratio_percent(matched: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    to_percent(count_to_f64(matched) / count_to_f64(total) * 100.0)
}

/// Per-factor scores between one candidate and one requisition, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    /// Mean of every evaluated requirement term
    pub overall: u8,

    /// `None` when the requisition has no canonical job title
    pub job_title: Option<u8>,

    /// Share of required, resolved licenses the candidate holds
    pub licenses: u8,

    /// Share of required, resolved certifications the candidate holds
    pub certifications: u8,

    /// `None` when the requisition has no state
    pub location: Option<u8>,
}

/// Score plus the credential ids behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub score: MatchScore,
    pub matched_licenses: Vec<EntryId>,
    pub matched_certifications: Vec<EntryId>,
    pub missing_required_licenses: Vec<EntryId>,
    pub missing_required_certifications: Vec<EntryId>,
}

/// Resolved, unexpired license ids held by the candidate
fn valid_license_ids(candidate: &Candidate, now: DateTime<Utc>) -> HashSet<&EntryId> {
    candidate
        .licenses
        .iter()
        .filter(|l| l.is_valid_at(now))
        .filter_map(|l| l.canonical_license_id.as_ref())
        .collect()
}

/// Resolved, unexpired certification ids held by the candidate
fn valid_certification_ids(candidate: &Candidate, now: DateTime<Utc>) -> HashSet<&EntryId> {
    candidate
        .certifications
        .iter()
        .filter(|c| c.is_valid_at(now))
        .filter_map(|c| c.canonical_certification_id.as_ref())
        .collect()
}

/// A valid license registered in `state`, or any valid compact license
fn licensed_in_state(licenses: &[CandidateLicense], state: &str, now: DateTime<Utc>) -> bool {
    licenses.iter().filter(|l| l.is_valid_at(now)).any(|l| {
        l.is_compact
            || l.state.as_deref().is_some_and(|s| {
                same_state(s, state) || s.trim().eq_ignore_ascii_case(state.trim())
            })
    })
}

/// Split required ids into (matched, missing) against the candidate's valid set
fn partition_required<'a>(
    required: impl Iterator<Item = &'a EntryId>,
    held: &HashSet<&EntryId>,
) -> (Vec<EntryId>, Vec<EntryId>) {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for id in required {
        if held.contains(id) {
            matched.push(id.clone());
        } else {
            missing.push(id.clone());
        }
    }
    (matched, missing)
}

/// Score a candidate against a requisition at evaluation time `now`.
///
/// Factors the requisition does not constrain are left out of `overall`
/// rather than scored. Required credentials without a canonical id are
/// ignored, as are preferred credentials.
#[must_use]
pub fn score(candidate: &Candidate, requisition: &Requisition, now: DateTime<Utc>) -> MatchOutcome {
    let mut terms: Vec<u8> = Vec::new();

    let job_title = requisition.canonical_job_title_id.as_ref().map(|wanted| {
        if candidate.canonical_job_title_id.as_ref() == Some(wanted) {
            100
        } else {
            0
        }
    });
    terms.extend(job_title);

    let location = requisition
        .state
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|state| {
            if licensed_in_state(&candidate.licenses, state, now) {
                100
            } else {
                0
            }
        });
    terms.extend(location);

    let held_licenses = valid_license_ids(candidate, now);
    let (matched_licenses, missing_required_licenses) = partition_required(
        requisition
            .licenses
            .iter()
            .filter(|r| r.requirement_level == RequirementLevel::Required)
            .filter_map(|r| r.canonical_license_id.as_ref()),
        &held_licenses,
    );

    let held_certifications = valid_certification_ids(candidate, now);
    let (matched_certifications, missing_required_certifications) = partition_required(
        requisition
            .certifications
            .iter()
            .filter(|r| r.requirement_level == RequirementLevel::Required)
            .filter_map(|r| r.canonical_certification_id.as_ref()),
        &held_certifications,
    );

    for _ in &matched_licenses {
        terms.push(100);
    }
    for _ in &missing_required_licenses {
        terms.push(0);
    }
    for _ in &matched_certifications {
        terms.push(100);
    }
    for _ in &missing_required_certifications {
        terms.push(0);
    }

    let licenses = ratio_percent(
        matched_licenses.len(),
        matched_licenses.len() + missing_required_licenses.len(),
    );
    let certifications = ratio_percent(
        matched_certifications.len(),
        matched_certifications.len() + missing_required_certifications.len(),
    );

    let overall = if terms.is_empty() {
        100
    } else {
        let sum: usize = terms.iter().map(|&t| usize::from(t)).sum();
        to_percent(count_to_f64(sum) / count_to_f64(terms.len()))
    };

    MatchOutcome {
        score: MatchScore {
            overall,
            job_title,
            licenses,
            certifications,
            location,
        },
        matched_licenses,
        matched_certifications,
        missing_required_licenses,
        missing_required_certifications,
    }
}
