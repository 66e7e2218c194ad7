//! Core data types for canonicalization and requirement matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`CanonicalEntry`]: A normalized reference record (facility, license type,
//!   certification type, or job title) with its abbreviation and aliases
//! - [`CanonicalResult`]: The outcome of resolving one raw string
//! - [`Candidate`], [`Requisition`]: Hydrated records with resolved credential ids
//! - [`CanonicalKey`], [`MatchType`], [`RequirementLevel`], [`RecordStatus`]: Classification types
//!
//! ## Credential Validity
//!
//! A candidate credential only takes part in matching when it carries a canonical
//! id and has not expired:
//!
//! | canonical id | expiration date     | valid |
//! |--------------|---------------------|-------|
//! | present      | none                | yes   |
//! | present      | after today (UTC)   | yes   |
//! | present      | today or earlier    | no    |
//! | missing      | any                 | no    |
//!
//! [`CanonicalEntry`]: entry::CanonicalEntry
//! [`CanonicalResult`]: entry::CanonicalResult
//! [`Candidate`]: record::Candidate
//! [`Requisition`]: record::Requisition
//! [`CanonicalKey`]: types::CanonicalKey
//! [`MatchType`]: types::MatchType
//! [`RequirementLevel`]: types::RequirementLevel
//! [`RecordStatus`]: types::RecordStatus

pub mod entry;
pub mod record;
pub mod types;
