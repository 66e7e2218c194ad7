//! # credmatch
//!
//! A library for canonicalizing healthcare staffing data and matching
//! candidates to job requisitions.
//!
//! Resumes and job postings describe the same things in many ways: "RN",
//! "R.N.", "Registered Nurse" and "Registred Nurse" are all one license type.
//! `credmatch` maps each raw string onto a canonical catalog entry, then uses
//! the resolved ids to score how well a candidate meets a requisition's
//! requirements.
//!
//! ## Features
//!
//! - **Exact matching**: Case-insensitive equality on abbreviation, name or alias
//! - **Fuzzy matching**: Levenshtein similarity for typos and small variations
//! - **Semantic matching**: Optional LLM-backed fallback, never trusted blindly
//! - **Fail-open resolution**: Unresolved values are flagged, never fatal
//! - **Requirement scoring**: Job title, location, license and certification terms
//! - **Ranking**: Candidates for a requisition, or requisitions for a candidate
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use credmatch::{CanonicalCatalog, CanonicalKey, DisabledMatcher, Resolver};
//!
//! # async fn run() {
//! // Load the embedded catalog of canonical entries
//! let catalog = CanonicalCatalog::load_embedded().unwrap();
//!
//! let resolver = Resolver::new(&catalog, Arc::new(DisabledMatcher));
//! let result = resolver.resolve(CanonicalKey::LicenseType, "R.N.").await;
//!
//! println!("{:?} via {} ({:.2})", result.canonical_id, result.match_type, result.confidence);
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Canonical catalog and roster storage
//! - [`canonical`]: Resolver waterfall and semantic matcher
//! - [`core`]: Core data types for entries, results and records
//! - [`matching`]: Requirement scoring and ranking
//! - [`utils`]: US state normalization
//! - [`cli`]: Command-line interface implementation

pub mod canonical;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod utils;

// Re-export commonly used types for convenience
pub use canonical::resolver::{ResolutionStats, ResolveRequest, Resolver, ResolverConfig};
pub use canonical::semantic::{DisabledMatcher, OpenAiMatcher, SemanticMatcher};
pub use catalog::roster::{PoolFilter, Roster};
pub use catalog::store::CanonicalCatalog;
pub use core::entry::{CanonicalEntry, CanonicalResult};
pub use core::record::{Candidate, Requisition};
pub use core::types::*;
pub use matching::engine::{MatchResult, MatchingConfig, MatchingEngine};
pub use matching::scoring::MatchScore;
