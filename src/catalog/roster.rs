use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::record::{Candidate, Requisition};
use crate::core::types::RecordStatus;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse roster: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Candidate not found: {0}")]
    CandidateNotFound(String),

    #[error("Requisition not found: {0}")]
    RequisitionNotFound(String),
}

/// Which records are eligible for ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolFilter {
    /// Only records with this status; `None` admits every status
    pub status: Option<RecordStatus>,

    /// Keep requisitions whose `expires_at` has passed
    pub include_expired: bool,
}

impl Default for PoolFilter {
    fn default() -> Self {
        Self {
            status: Some(RecordStatus::Active),
            include_expired: false,
        }
    }
}

impl PoolFilter {
    fn admits(&self, status: RecordStatus) -> bool {
        self.status.map_or(true, |wanted| wanted == status)
    }
}

/// Serializable roster format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterData {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub requisitions: Vec<Requisition>,
}

/// Hydrated candidates and requisitions, read-only to the matcher
#[derive(Debug, Default)]
pub struct Roster {
    pub candidates: Vec<Candidate>,
    pub requisitions: Vec<Requisition>,
    candidate_index: HashMap<String, usize>,
    requisition_index: HashMap<String, usize>,
}

impl Roster {
    pub fn new(candidates: Vec<Candidate>, requisitions: Vec<Requisition>) -> Self {
        let candidate_index = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        let requisition_index = requisitions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        Self {
            candidates,
            requisitions,
            candidate_index,
            requisition_index,
        }
    }

    /// Load roster from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path)?;
        let roster = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            candidates = roster.candidates.len(),
            requisitions = roster.requisitions.len(),
            "loaded roster"
        );
        Ok(roster)
    }

    /// Parse roster from JSON string
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let data: RosterData = serde_json::from_str(json)?;
        Ok(Self::new(data.candidates, data.requisitions))
    }

    pub fn candidate(&self, id: &str) -> Result<&Candidate, RosterError> {
        self.candidate_index
            .get(id)
            .map(|&idx| &self.candidates[idx])
            .ok_or_else(|| RosterError::CandidateNotFound(id.to_string()))
    }

    pub fn requisition(&self, id: &str) -> Result<&Requisition, RosterError> {
        self.requisition_index
            .get(id)
            .map(|&idx| &self.requisitions[idx])
            .ok_or_else(|| RosterError::RequisitionNotFound(id.to_string()))
    }

    /// Candidates eligible for ranking against a requisition
    pub fn candidate_pool(&self, filter: &PoolFilter) -> Vec<&Candidate> {
        self.candidates
            .iter()
            .filter(|c| filter.admits(c.status))
            .collect()
    }

    /// Requisitions eligible for ranking against a candidate
    pub fn requisition_pool(&self, filter: &PoolFilter, now: DateTime<Utc>) -> Vec<&Requisition> {
        self.requisitions
            .iter()
            .filter(|r| filter.admits(r.status))
            .filter(|r| filter.include_expired || r.is_open_at(now))
            .collect()
    }
}
