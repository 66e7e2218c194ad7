//! Read-only stores consumed by the resolver and the matcher.
//!
//! - [`CanonicalCatalog`]: canonical entries (facilities, license types,
//!   certification types, job titles) keyed by [`CanonicalKey`]. An embedded
//!   catalog is compiled into the binary, but custom catalogs can also be loaded
//!   from JSON files.
//! - [`Roster`]: hydrated candidates and requisitions with their resolved
//!   credential ids, plus the eligibility filters used when ranking.
//!
//! ## Example
//!
//! ```rust,no_run
//! use credmatch::catalog::store::CanonicalCatalog;
//! use credmatch::core::types::CanonicalKey;
//!
//! let catalog = CanonicalCatalog::load_embedded().unwrap();
//!
//! for entry in catalog.entries(CanonicalKey::LicenseType) {
//!     println!("{} ({})", entry.name, entry.id);
//! }
//! ```
//!
//! [`CanonicalCatalog`]: store::CanonicalCatalog
//! [`Roster`]: roster::Roster
//! [`CanonicalKey`]: crate::core::types::CanonicalKey

pub mod roster;
pub mod store;
