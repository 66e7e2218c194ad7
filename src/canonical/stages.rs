//! The three waterfall stages, each usable on its own.
//!
//! Every stage looks at the same entry list and either produces a
//! [`StageMatch`] or nothing; the resolver tries them in order and stops at
//! the first hit.

use std::time::Duration;

use crate::canonical::semantic::{SemanticError, SemanticMatcher, SemanticRequest};
use crate::canonical::similarity::similarity;
use crate::core::entry::{CanonicalEntry, ComparisonField};
use crate::core::types::CanonicalKey;

/// A stage hit: which entry, on which field, and how strongly
#[derive(Debug, Clone, PartialEq)]
pub struct StageMatch<'a> {
    pub entry: &'a CanonicalEntry,
    pub field: ComparisonField,
    pub matched: &'a str,
    pub score: f64,
}

impl StageMatch<'_> {
    /// e.g. `abbreviation 'RN'`
    #[must_use]
    pub fn matched_on(&self) -> String {
        format!("{} '{}'", self.field, self.matched)
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Case-insensitive, trimmed equality.
///
/// Abbreviations of every entry are checked first, then names, then aliases,
/// so an abbreviation hit anywhere in the list wins over a name or alias hit.
#[must_use]
pub fn exact_match<'a>(raw: &str, entries: &'a [CanonicalEntry]) -> Option<StageMatch<'a>> {
    let needle = normalize(raw);
    let hit = |entry: &'a CanonicalEntry, field, candidate: &'a str| {
        (candidate.trim().to_lowercase() == needle).then_some(StageMatch {
            entry,
            field,
            matched: candidate,
            score: 1.0,
        })
    };

    entries
        .iter()
        .find_map(|e| {
            e.abbreviation
                .as_deref()
                .filter(|a| !a.is_empty())
                .and_then(|a| hit(e, ComparisonField::Abbreviation, a))
        })
        .or_else(|| {
            entries
                .iter()
                .find_map(|e| hit(e, ComparisonField::Name, e.name.as_str()))
        })
        .or_else(|| {
            entries.iter().find_map(|e| {
                e.aliases
                    .iter()
                    .find_map(|a| hit(e, ComparisonField::Alias, a.as_str()))
            })
        })
}

/// Best normalized edit-distance similarity across every comparison string.
///
/// Only the single best comparison is kept (the first one reaching it on ties)
/// and it is accepted only at or above `threshold`.
#[must_use]
pub fn fuzzy_match<'a>(
    raw: &str,
    entries: &'a [CanonicalEntry],
    threshold: f64,
) -> Option<StageMatch<'a>> {
    let needle = normalize(raw);
    let mut best: Option<StageMatch<'a>> = None;

    for entry in entries {
        for (field, candidate) in entry.comparison_strings() {
            let score = similarity(&needle, candidate);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(StageMatch {
                    entry,
                    field,
                    matched: candidate,
                    score,
                });
            }
        }
    }

    best.filter(|b| b.score >= threshold)
}

/// Thresholds applied to what the semantic matcher returns
#[derive(Debug, Clone, Copy)]
pub struct SemanticLimits {
    /// Selections below this confidence are discarded
    pub min_confidence: f64,
    /// Accepted confidence never exceeds this
    pub confidence_cap: f64,
    pub timeout: Duration,
}

/// An accepted semantic selection
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch<'a> {
    pub entry: &'a CanonicalEntry,
    /// Already capped
    pub confidence: f64,
    pub reasoning: String,
}

/// Why the semantic stage produced nothing
#[derive(Debug, thiserror::Error)]
pub enum SemanticRejection {
    #[error("Semantic matcher did not identify a confident canonical match")]
    NotConfident,

    #[error("Semantic matcher returned unknown canonical id '{0}'")]
    UnknownId(String),

    #[error("Semantic matching failed: {0}")]
    Failed(#[from] SemanticError),
}

/// Ask the semantic matcher and validate its answer against `entries`.
///
/// The matcher is never trusted: ids not present in `entries` are rejected,
/// out-of-range confidences count as malformed output, and a call exceeding
/// `limits.timeout` is treated as a failure.
pub async fn semantic_match<'a>(
    matcher: &dyn SemanticMatcher,
    key: CanonicalKey,
    raw: &str,
    entries: &'a [CanonicalEntry],
    limits: SemanticLimits,
) -> Result<SemanticMatch<'a>, SemanticRejection> {
    let request = SemanticRequest::new(key, raw, entries);
    let selection = tokio::time::timeout(limits.timeout, matcher.select(&request))
        .await
        .map_err(|_| SemanticError::Timeout(limits.timeout))??;

    if !(0.0..=1.0).contains(&selection.confidence) {
        return Err(SemanticError::MalformedResponse(format!(
            "confidence {} outside [0, 1]",
            selection.confidence
        ))
        .into());
    }

    let Some(id) = selection.match_id else {
        return Err(SemanticRejection::NotConfident);
    };
    if selection.confidence < limits.min_confidence {
        return Err(SemanticRejection::NotConfident);
    }

    let entry = entries
        .iter()
        .find(|e| e.id.as_str() == id)
        .ok_or(SemanticRejection::UnknownId(id))?;

    Ok(SemanticMatch {
        entry,
        confidence: selection.confidence.min(limits.confidence_cap),
        reasoning: selection.reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::semantic::SemanticSelection;
    use async_trait::async_trait;

    fn licenses() -> Vec<CanonicalEntry> {
        vec![
            CanonicalEntry::new("lic_rn", "Registered Nurse")
                .with_abbreviation("RN")
                .with_aliases(["R.N."]),
            CanonicalEntry::new("lic_lpn", "Licensed Practical Nurse")
                .with_abbreviation("LPN")
                .with_aliases(["RN Candidate"]),
            // Name collides with the first entry's abbreviation
            CanonicalEntry::new("lic_odd", "rn"),
        ]
    }

    #[test]
    fn test_exact_match_on_abbreviation() {
        let entries = licenses();
        let m = exact_match("  rn ", &entries).unwrap();
        assert_eq!(m.entry.id.as_str(), "lic_rn");
        assert_eq!(m.field, ComparisonField::Abbreviation);
        assert_eq!(m.matched_on(), "abbreviation 'RN'");
        assert!((m.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_match_abbreviation_outranks_later_name() {
        let mut entries = licenses();
        entries.reverse();
        // lic_odd's name comes first in the list, but lic_rn's abbreviation still wins
        let m = exact_match("RN", &entries).unwrap();
        assert_eq!(m.entry.id.as_str(), "lic_rn");
    }

    #[test]
    fn test_exact_match_name_and_alias() {
        let entries = licenses();
        let m = exact_match("licensed practical nurse", &entries).unwrap();
        assert_eq!(m.entry.id.as_str(), "lic_lpn");
        assert_eq!(m.field, ComparisonField::Name);

        let m = exact_match("r.n.", &entries).unwrap();
        assert_eq!(m.entry.id.as_str(), "lic_rn");
        assert_eq!(m.matched_on(), "alias 'R.N.'");
    }

    #[test]
    fn test_exact_match_none() {
        assert!(exact_match("Nurse Practitioner", &licenses()).is_none());
        assert!(exact_match("RN", &[]).is_none());
    }

    #[test]
    fn test_fuzzy_match_accepts_typo() {
        let entries = licenses();
        let m = fuzzy_match("Registerd Nurse", &entries, 0.9).unwrap();
        assert_eq!(m.entry.id.as_str(), "lic_rn");
        assert_eq!(m.field, ComparisonField::Name);
        assert!((m.score - 0.9375).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_match_below_threshold() {
        let entries = vec![CanonicalEntry::new("lic_lpn", "LPN")];
        assert!(fuzzy_match("RN", &entries, 0.9).is_none());
        // The same pair passes with a looser threshold
        assert!(fuzzy_match("RN", &entries, 0.3).is_some());
    }

    #[test]
    fn test_fuzzy_match_prefers_highest_score() {
        let entries = vec![
            // 2 edits over 17 characters
            CanonicalEntry::new("plural", "Registered Nurses"),
            // 1 edit over 16 characters
            CanonicalEntry::new("singular", "Registered Nurse"),
        ];
        let m = fuzzy_match("Registred Nurse", &entries, 0.85).unwrap();
        assert_eq!(m.entry.id.as_str(), "singular");
        assert!((m.score - 0.9375).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_match_tie_keeps_first() {
        let entries = vec![
            CanonicalEntry::new("first", "Charge Nursex"),
            CanonicalEntry::new("second", "Charge Nursey"),
        ];
        let m = fuzzy_match("Charge Nurse", &entries, 0.9).unwrap();
        assert_eq!(m.entry.id.as_str(), "first");
    }

    struct Fixed(Result<SemanticSelection, ()>);

    #[async_trait]
    impl SemanticMatcher for Fixed {
        async fn select(
            &self,
            _request: &SemanticRequest<'_>,
        ) -> Result<SemanticSelection, SemanticError> {
            self.0
                .clone()
                .map_err(|()| SemanticError::MalformedResponse("bad".to_string()))
        }
    }

    struct Slow;

    #[async_trait]
    impl SemanticMatcher for Slow {
        async fn select(
            &self,
            _request: &SemanticRequest<'_>,
        ) -> Result<SemanticSelection, SemanticError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SemanticSelection::abstain("too late"))
        }
    }

    fn limits() -> SemanticLimits {
        SemanticLimits {
            min_confidence: 0.5,
            confidence_cap: 0.7,
            timeout: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn test_semantic_match_caps_confidence() {
        let entries = licenses();
        let matcher = Fixed(Ok(SemanticSelection::pick("lic_rn", 0.95, "same license")));
        let m = semantic_match(&matcher, CanonicalKey::LicenseType, "nurse (registered)", &entries, limits())
            .await
            .unwrap();
        assert_eq!(m.entry.id.as_str(), "lic_rn");
        assert!((m.confidence - 0.7).abs() < 1e-9);
        assert_eq!(m.reasoning, "same license");
    }

    #[tokio::test]
    async fn test_semantic_match_keeps_confidence_under_cap() {
        let entries = licenses();
        let matcher = Fixed(Ok(SemanticSelection::pick("lic_lpn", 0.6, "close")));
        let m = semantic_match(&matcher, CanonicalKey::LicenseType, "practical nurse lic", &entries, limits())
            .await
            .unwrap();
        assert!((m.confidence - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_semantic_match_rejects_unknown_id() {
        let entries = licenses();
        let matcher = Fixed(Ok(SemanticSelection::pick("lic_made_up", 0.9, "invented")));
        let err = semantic_match(&matcher, CanonicalKey::LicenseType, "x", &entries, limits())
            .await
            .unwrap_err();
        assert!(matches!(err, SemanticRejection::UnknownId(ref id) if id == "lic_made_up"));
        assert_eq!(
            err.to_string(),
            "Semantic matcher returned unknown canonical id 'lic_made_up'"
        );
    }

    #[tokio::test]
    async fn test_semantic_match_rejects_low_confidence_and_abstention() {
        let entries = licenses();
        let low = Fixed(Ok(SemanticSelection::pick("lic_rn", 0.49, "maybe")));
        assert!(matches!(
            semantic_match(&low, CanonicalKey::LicenseType, "x", &entries, limits()).await,
            Err(SemanticRejection::NotConfident)
        ));

        let abstain = Fixed(Ok(SemanticSelection::abstain("no idea")));
        assert!(matches!(
            semantic_match(&abstain, CanonicalKey::LicenseType, "x", &entries, limits()).await,
            Err(SemanticRejection::NotConfident)
        ));
    }

    #[tokio::test]
    async fn test_semantic_match_rejects_out_of_range_confidence() {
        let entries = licenses();
        let matcher = Fixed(Ok(SemanticSelection::pick("lic_rn", 7.0, "very sure")));
        assert!(matches!(
            semantic_match(&matcher, CanonicalKey::LicenseType, "x", &entries, limits()).await,
            Err(SemanticRejection::Failed(SemanticError::MalformedResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_semantic_match_failure_and_timeout() {
        let entries = licenses();
        let broken = Fixed(Err(()));
        assert!(matches!(
            semantic_match(&broken, CanonicalKey::LicenseType, "x", &entries, limits()).await,
            Err(SemanticRejection::Failed(_))
        ));

        let err = semantic_match(&Slow, CanonicalKey::LicenseType, "x", &entries, limits())
            .await
            .unwrap_err();
        assert!(matches!(err, SemanticRejection::Failed(SemanticError::Timeout(_))));
        assert!(err.to_string().starts_with("Semantic matching failed: timed out"));
    }
}
