//! Canonical resolution: mapping free-text values onto canonical entries.
//!
//! - [`Resolver`]: Orchestrates the waterfall for single values and batches
//! - [`stages`]: The exact, fuzzy and semantic stages as standalone functions
//! - [`SemanticMatcher`]: The injected semantic-matching capability
//! - [`similarity`]: Edit distance and normalized similarity
//!
//! ## Waterfall
//!
//! 1. **Exact**: trimmed, case-insensitive equality on abbreviation, name or alias
//!    (confidence 1.0)
//! 2. **Fuzzy**: best Levenshtein similarity across all comparison strings,
//!    accepted at 0.90 or above (confidence = similarity)
//! 3. **Semantic**: the injected matcher picks at most one id from the entry
//!    list; unknown ids are rejected and confidence is capped at 0.7
//!
//! Resolution never fails. Misses, semantic service errors and timeouts all
//! come back as `match_type = none` with a reason.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use credmatch::canonical::resolver::Resolver;
//! use credmatch::canonical::semantic::DisabledMatcher;
//! use credmatch::catalog::store::CanonicalCatalog;
//! use credmatch::core::types::CanonicalKey;
//!
//! # async fn run() {
//! let catalog = CanonicalCatalog::load_embedded().unwrap();
//! let resolver = Resolver::new(&catalog, Arc::new(DisabledMatcher));
//!
//! let result = resolver.resolve(CanonicalKey::CertType, "Basic Life Suport").await;
//! println!("{:?} {:?} {:.2}", result.canonical_id, result.match_type, result.confidence);
//! # }
//! ```
//!
//! [`Resolver`]: resolver::Resolver
//! [`SemanticMatcher`]: semantic::SemanticMatcher

pub mod resolver;
pub mod semantic;
pub mod similarity;
pub mod stages;
