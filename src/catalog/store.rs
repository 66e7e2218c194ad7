use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::entry::CanonicalEntry;
use crate::core::types::{CanonicalKey, EntryId};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate {key} entry id '{id}'")]
    DuplicateId { key: CanonicalKey, id: EntryId },
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    #[serde(default)]
    pub facilities: Vec<CanonicalEntry>,
    #[serde(default)]
    pub licenses: Vec<CanonicalEntry>,
    #[serde(default)]
    pub certifications: Vec<CanonicalEntry>,
    #[serde(default)]
    pub job_titles: Vec<CanonicalEntry>,
}

/// Read-only store of canonical entries, one ordered list per key
#[derive(Debug, Default)]
pub struct CanonicalCatalog {
    entries: HashMap<CanonicalKey, Vec<CanonicalEntry>>,

    /// Index: (key, id) -> index in that key's entry list
    id_to_index: HashMap<(CanonicalKey, EntryId), usize>,
}

impl CanonicalCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded default catalog
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/healthcare_canonical.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            entries = catalog.len(),
            "loaded canonical catalog"
        );
        Ok(catalog)
    }

    /// Parse catalog from JSON string
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            tracing::warn!(
                expected = CATALOG_VERSION,
                found = %data.version,
                "catalog version mismatch"
            );
        }

        let mut catalog = Self::new();
        for (key, entries) in [
            (CanonicalKey::FacilityName, data.facilities),
            (CanonicalKey::LicenseType, data.licenses),
            (CanonicalKey::CertType, data.certifications),
            (CanonicalKey::JobTitle, data.job_titles),
        ] {
            for entry in entries {
                catalog.add_entry(key, entry)?;
            }
        }

        Ok(catalog)
    }

    /// Add an entry under `key`. Ids must be unique within a key.
    pub fn add_entry(&mut self, key: CanonicalKey, entry: CanonicalEntry) -> Result<(), CatalogError> {
        let list = self.entries.entry(key).or_default();
        let lookup = (key, entry.id.clone());
        if self.id_to_index.contains_key(&lookup) {
            return Err(CatalogError::DuplicateId { key, id: entry.id });
        }
        self.id_to_index.insert(lookup, list.len());
        list.push(entry);
        Ok(())
    }

    /// All entries for a key, in insertion order
    pub fn entries(&self, key: CanonicalKey) -> &[CanonicalEntry] {
        self.entries.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Get an entry by key and ID
    pub fn get(&self, key: CanonicalKey, id: &EntryId) -> Option<&CanonicalEntry> {
        self.id_to_index
            .get(&(key, id.clone()))
            .map(|&idx| &self.entries[&key][idx])
    }

    /// Find an entry by ID under any key
    pub fn find(&self, id: &EntryId) -> Option<(CanonicalKey, &CanonicalEntry)> {
        CanonicalKey::ALL
            .into_iter()
            .find_map(|key| self.get(key, id).map(|entry| (key, entry)))
    }

    /// Export catalog to JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            facilities: self.entries(CanonicalKey::FacilityName).to_vec(),
            licenses: self.entries(CanonicalKey::LicenseType).to_vec(),
            certifications: self.entries(CanonicalKey::CertType).to_vec(),
            job_titles: self.entries(CanonicalKey::JobTitle).to_vec(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of entries across all keys
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
