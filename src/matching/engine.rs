use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::record::{Candidate, Requisition};
use crate::core::types::EntryId;
use crate::matching::scoring::{score, MatchOutcome, MatchScore};

/// One candidate scored against one requisition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate_id: String,
    pub candidate_name: String,
    pub requisition_id: String,

    /// Raw job title from the requisition
    pub job_title: String,
    pub facility_name: Option<String>,

    pub score: MatchScore,
    pub matched_licenses: Vec<EntryId>,
    pub matched_certifications: Vec<EntryId>,
    pub missing_required_licenses: Vec<EntryId>,
    pub missing_required_certifications: Vec<EntryId>,
}

impl MatchResult {
    pub fn new(candidate: &Candidate, requisition: &Requisition, now: DateTime<Utc>) -> Self {
        let MatchOutcome {
            score,
            matched_licenses,
            matched_certifications,
            missing_required_licenses,
            missing_required_certifications,
        } = score(candidate, requisition, now);

        Self {
            candidate_id: candidate.id.clone(),
            candidate_name: candidate.display_name(),
            requisition_id: requisition.id.clone(),
            job_title: requisition.job_title.clone(),
            facility_name: requisition.raw_facility_name.clone(),
            score,
            matched_licenses,
            matched_certifications,
            missing_required_licenses,
            missing_required_certifications,
        }
    }
}

/// Configuration for ranking
#[derive(Debug, Clone, Default)]
pub struct MatchingConfig {
    /// Drop results whose overall score is below this
    pub min_score: u8,
    /// Keep at most this many results
    pub limit: Option<usize>,
}

/// Scores and ranks candidates against requisitions
pub struct MatchingEngine {
    config: MatchingConfig,
    now: DateTime<Utc>,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    /// Create an engine with default configuration, evaluating expiry at the current time
    pub fn new() -> Self {
        Self::with_config(MatchingConfig::default())
    }

    pub fn with_config(config: MatchingConfig) -> Self {
        Self {
            config,
            now: Utc::now(),
        }
    }

    /// Evaluate expiry at a fixed instant instead of the time of construction
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Score one pair
    pub fn score(&self, candidate: &Candidate, requisition: &Requisition) -> MatchResult {
        MatchResult::new(candidate, requisition, self.now)
    }

    /// Rank a candidate pool for one requisition, best first.
    ///
    /// Ties on the overall score are ordered by candidate id.
    pub fn rank_candidates_for(
        &self,
        requisition: &Requisition,
        pool: &[&Candidate],
    ) -> Vec<MatchResult> {
        let results: Vec<MatchResult> = pool
            .par_iter()
            .map(|candidate| self.score(candidate, requisition))
            .collect();
        self.finish(results, |a, b| a.candidate_id.cmp(&b.candidate_id))
    }

    /// Rank a requisition pool for one candidate, best first.
    ///
    /// Ties on the overall score are ordered by requisition id.
    pub fn rank_requisitions_for(
        &self,
        candidate: &Candidate,
        pool: &[&Requisition],
    ) -> Vec<MatchResult> {
        let results: Vec<MatchResult> = pool
            .par_iter()
            .map(|requisition| self.score(candidate, requisition))
            .collect();
        self.finish(results, |a, b| a.requisition_id.cmp(&b.requisition_id))
    }

    fn finish(
        &self,
        mut results: Vec<MatchResult>,
        tie_break: impl Fn(&MatchResult, &MatchResult) -> Ordering,
    ) -> Vec<MatchResult> {
        results.retain(|r| r.score.overall >= self.config.min_score);
        results.sort_by(|a, b| {
            b.score
                .overall
                .cmp(&a.score.overall)
                .then_with(|| tie_break(a, b))
        });
        if let Some(limit) = self.config.limit {
            results.truncate(limit);
        }
        tracing::debug!(results = results.len(), "ranked");
        results
    }
}
