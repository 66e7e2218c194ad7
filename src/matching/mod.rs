//! Requirement matching between candidates and requisitions.
//!
//! - [`MatchingEngine`]: Scores one pair or ranks a pool in either direction
//! - [`MatchScore`]: Per-factor scores, each 0-100
//! - [`score`]: The pure scoring function underneath both ranking directions
//!
//! ## Scoring
//!
//! Only resolved, unexpired candidate credentials count. The requisition
//! decides which terms are evaluated:
//!
//! - **Job title**: 100 or 0, only if the requisition has a canonical job title
//! - **Location**: 100 if a valid license is in the requisition's state or is
//!   compact, else 0; only if the requisition has a state
//! - **One term per required credential**: 100 if held, else 0. Requirements
//!   without a canonical id and preferred requirements are skipped.
//!
//! `overall` is the rounded mean of those terms, or 100 if there are none.
//! `licenses` and `certifications` report the matched share of required
//! credentials (100 when nothing is required).
//!
//! ## Example
//!
//! ```rust
//! use credmatch::core::record::{Candidate, CandidateLicense, LicenseRequirement, Requisition};
//! use credmatch::matching::engine::MatchingEngine;
//!
//! let candidate = Candidate::new("c1", "Ada", "Lovelace")
//!     .with_license(CandidateLicense::new("lic_rn").in_state("TX"));
//! let requisition = Requisition::new("r1", "ICU RN")
//!     .in_state("TX")
//!     .with_license(LicenseRequirement::required("lic_rn"));
//!
//! let result = MatchingEngine::new().score(&candidate, &requisition);
//! assert_eq!(result.score.overall, 100);
//! ```
//!
//! [`MatchingEngine`]: engine::MatchingEngine
//! [`MatchScore`]: scoring::MatchScore
//! [`score`]: scoring::score

pub mod engine;
pub mod scoring;
