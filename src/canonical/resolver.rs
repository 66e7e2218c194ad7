use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::canonical::semantic::SemanticMatcher;
use crate::canonical::stages::{
    exact_match, fuzzy_match, semantic_match, SemanticLimits, SemanticRejection,
};
use crate::catalog::store::CanonicalCatalog;
use crate::core::entry::{CanonicalEntry, CanonicalResult};
use crate::core::types::{CanonicalKey, MatchType};

/// Default minimum similarity for a fuzzy match
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.90;

/// Default confidence a semantic selection must reach
pub const DEFAULT_SEMANTIC_MIN_CONFIDENCE: f64 = 0.5;

/// Default ceiling on stored semantic confidence, below every deterministic match
pub const DEFAULT_SEMANTIC_CONFIDENCE_CAP: f64 = 0.7;

/// Default per-call semantic matcher timeout
pub const DEFAULT_SEMANTIC_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Thresholds for the resolution waterfall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub fuzzy_threshold: f64,
    pub semantic_min_confidence: f64,
    pub semantic_confidence_cap: f64,
    pub semantic_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            semantic_min_confidence: DEFAULT_SEMANTIC_MIN_CONFIDENCE,
            semantic_confidence_cap: DEFAULT_SEMANTIC_CONFIDENCE_CAP,
            semantic_timeout_secs: DEFAULT_SEMANTIC_TIMEOUT_SECS,
        }
    }
}

impl ResolverConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// All thresholds must lie in [0, 1] and the timeout must be non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("fuzzy_threshold", self.fuzzy_threshold),
            ("semantic_min_confidence", self.semantic_min_confidence),
            ("semantic_confidence_cap", self.semantic_confidence_cap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        if self.semantic_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "semantic_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn semantic_limits(&self) -> SemanticLimits {
        SemanticLimits {
            min_confidence: self.semantic_min_confidence,
            confidence_cap: self.semantic_confidence_cap,
            timeout: Duration::from_secs(self.semantic_timeout_secs),
        }
    }
}

/// One raw value waiting to be resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub key: CanonicalKey,
    #[serde(alias = "raw_value")]
    pub raw_value: String,
}

impl ResolveRequest {
    pub fn new(key: CanonicalKey, raw_value: impl Into<String>) -> Self {
        Self {
            key,
            raw_value: raw_value.into(),
        }
    }
}

/// Resolves raw strings onto canonical entries: exact, then fuzzy, then semantic
pub struct Resolver<'a> {
    catalog: &'a CanonicalCatalog,
    matcher: Arc<dyn SemanticMatcher>,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with default thresholds
    pub fn new(catalog: &'a CanonicalCatalog, matcher: Arc<dyn SemanticMatcher>) -> Self {
        Self::with_config(catalog, matcher, ResolverConfig::default())
    }

    pub fn with_config(
        catalog: &'a CanonicalCatalog,
        matcher: Arc<dyn SemanticMatcher>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            catalog,
            matcher,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve one raw value against the catalog entries for `key`.
    ///
    /// Never fails: an unresolved value comes back with `match_type = none` and
    /// a reason, including when the semantic matcher is down.
    pub async fn resolve(&self, key: CanonicalKey, raw_value: &str) -> CanonicalResult {
        self.resolve_against(key, raw_value, self.catalog.entries(key))
            .await
    }

    /// Resolve many values concurrently. Output order follows input order.
    pub async fn resolve_batch(&self, items: &[ResolveRequest]) -> Vec<CanonicalResult> {
        futures::future::join_all(
            items
                .iter()
                .map(|item| self.resolve(item.key, &item.raw_value)),
        )
        .await
    }

    /// Run the waterfall against an explicit entry list
    pub async fn resolve_against(
        &self,
        key: CanonicalKey,
        raw_value: &str,
        entries: &[CanonicalEntry],
    ) -> CanonicalResult {
        if raw_value.trim().is_empty() {
            return CanonicalResult::none(key, raw_value, "Empty input value");
        }

        if entries.is_empty() {
            debug!(%key, "no canonical entries");
            return CanonicalResult::none(
                key,
                raw_value,
                format!("No canonical entries found for {key}"),
            );
        }

        if let Some(hit) = exact_match(raw_value, entries) {
            debug!(%key, raw_value, id = %hit.entry.id, "exact match");
            return CanonicalResult::matched(
                key,
                raw_value,
                hit.entry,
                MatchType::Exact,
                1.0,
                format!("Exact match on {}", hit.matched_on()),
            );
        }

        if let Some(hit) = fuzzy_match(raw_value, entries, self.config.fuzzy_threshold) {
            debug!(%key, raw_value, id = %hit.entry.id, score = hit.score, "fuzzy match");
            return CanonicalResult::matched(
                key,
                raw_value,
                hit.entry,
                MatchType::Fuzzy,
                hit.score,
                format!(
                    "Fuzzy match on {} ({:.0}% match)",
                    hit.matched_on(),
                    hit.score * 100.0
                ),
            );
        }

        match semantic_match(
            self.matcher.as_ref(),
            key,
            raw_value,
            entries,
            self.config.semantic_limits(),
        )
        .await
        {
            Ok(hit) => {
                debug!(%key, raw_value, id = %hit.entry.id, confidence = hit.confidence, "semantic match");
                CanonicalResult::matched(
                    key,
                    raw_value,
                    hit.entry,
                    MatchType::Ai,
                    hit.confidence,
                    format!("Semantic match: {}", hit.reasoning),
                )
            }
            Err(rejection) => {
                match &rejection {
                    SemanticRejection::NotConfident => {
                        debug!(%key, raw_value, "no confident semantic match");
                    }
                    SemanticRejection::UnknownId(id) => {
                        warn!(%key, raw_value, id, "semantic matcher returned an unknown id");
                    }
                    SemanticRejection::Failed(e) => {
                        warn!(%key, raw_value, error = %e, "semantic matching failed");
                    }
                }
                CanonicalResult::none(key, raw_value, rejection.to_string())
            }
        }
    }
}

/// Resolved / unresolved counts over a batch of results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub ai: usize,
    pub manual: usize,
}

impl ResolutionStats {
    #[must_use]
    pub fn from_results(results: &[CanonicalResult]) -> Self {
        let mut stats = Self::default();
        for result in results {
            stats.total += 1;
            if result.is_resolved() {
                stats.resolved += 1;
            } else {
                stats.unresolved += 1;
            }
            match result.match_type {
                MatchType::Exact => stats.exact += 1,
                MatchType::Fuzzy => stats.fuzzy += 1,
                MatchType::Ai => stats.ai += 1,
                MatchType::Manual => stats.manual += 1,
                MatchType::None => {}
            }
        }
        stats
    }

    #[must_use]
    pub fn has_unresolved(&self) -> bool {
        self.unresolved > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::semantic::{
        DisabledMatcher, SemanticError, SemanticRequest, SemanticSelection,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub matcher that always returns the same selection and counts calls
    struct Stub {
        selection: SemanticSelection,
        calls: AtomicUsize,
    }

    impl Stub {
        fn new(selection: SemanticSelection) -> Arc<Self> {
            Arc::new(Self {
                selection,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SemanticMatcher for Stub {
        async fn select(
            &self,
            _request: &SemanticRequest<'_>,
        ) -> Result<SemanticSelection, SemanticError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.selection.clone())
        }
    }

    fn make_catalog() -> CanonicalCatalog {
        CanonicalCatalog::load_embedded().unwrap()
    }

    #[tokio::test]
    async fn test_resolve_exact() {
        let catalog = make_catalog();
        let resolver = Resolver::new(&catalog, Arc::new(DisabledMatcher));

        for raw in ["RN", "registered nurse", "  R.N.  ", "Registered Professional Nurse"] {
            let result = resolver.resolve(CanonicalKey::LicenseType, raw).await;
            assert_eq!(result.canonical_id.as_ref().unwrap().as_str(), "lic_rn", "{raw}");
            assert_eq!(result.match_type, MatchType::Exact);
            assert!((result.confidence - 1.0).abs() < f64::EPSILON);
            assert_eq!(result.canonical_value.as_deref(), Some("Registered Nurse"));
            assert_eq!(result.raw_value, raw);
        }
    }

    #[tokio::test]
    async fn test_resolve_fuzzy() {
        let catalog = make_catalog();
        let resolver = Resolver::new(&catalog, Arc::new(DisabledMatcher));

        let result = resolver
            .resolve(CanonicalKey::CertType, "Basic Life Suport")
            .await;
        assert_eq!(result.canonical_id.unwrap().as_str(), "cert_bls");
        assert_eq!(result.match_type, MatchType::Fuzzy);
        // 1 edit over 18 characters
        assert!((result.confidence - (1.0 - 1.0 / 18.0)).abs() < 1e-9);
        assert_eq!(
            result.reason,
            "Fuzzy match on name 'Basic Life Support' (94% match)"
        );
    }

    #[tokio::test]
    async fn test_resolve_falls_through_to_semantic() {
        let catalog = make_catalog();
        let stub = Stub::new(SemanticSelection::pick("cert_bls", 0.9, "CPR card is BLS"));
        let resolver = Resolver::new(&catalog, stub.clone());

        let result = resolver.resolve(CanonicalKey::CertType, "AHA CPR card").await;
        assert_eq!(result.canonical_id.unwrap().as_str(), "cert_bls");
        assert_eq!(result.match_type, MatchType::Ai);
        assert!((result.confidence - 0.7).abs() < 1e-9);
        assert_eq!(result.reason, "Semantic match: CPR card is BLS");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_exact_match_skips_semantic() {
        let catalog = make_catalog();
        let stub = Stub::new(SemanticSelection::pick("cert_acls", 0.9, "wrong"));
        let resolver = Resolver::new(&catalog, stub.clone());

        let result = resolver.resolve(CanonicalKey::CertType, "bls").await;
        assert_eq!(result.canonical_id.unwrap().as_str(), "cert_bls");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_semantic_id_from_other_key_is_rejected() {
        let catalog = make_catalog();
        // lic_rn exists in the catalog, but not among certification entries
        let stub = Stub::new(SemanticSelection::pick("lic_rn", 0.9, "nurse"));
        let resolver = Resolver::new(&catalog, stub);

        let result = resolver
            .resolve(CanonicalKey::CertType, "nursing credential")
            .await;
        assert!(result.canonical_id.is_none());
        assert_eq!(result.match_type, MatchType::None);
        assert!(result.confidence.abs() < f64::EPSILON);
        assert_eq!(
            result.reason,
            "Semantic matcher returned unknown canonical id 'lic_rn'"
        );
    }

    #[tokio::test]
    async fn test_semantic_failure_is_recovered() {
        let catalog = make_catalog();
        let resolver = Resolver::new(&catalog, Arc::new(DisabledMatcher));

        let result = resolver
            .resolve(CanonicalKey::JobTitle, "Director of Vibes")
            .await;
        assert!(!result.is_resolved());
        assert_eq!(result.match_type, MatchType::None);
        assert_eq!(
            result.reason,
            "Semantic matching failed: semantic matching is disabled"
        );
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let catalog = make_catalog();
        let stub = Stub::new(SemanticSelection::pick("lic_rn", 0.9, "x"));
        let resolver = Resolver::new(&catalog, stub.clone());

        for raw in ["", "   ", "\t\n"] {
            let result = resolver.resolve(CanonicalKey::LicenseType, raw).await;
            assert_eq!(result.match_type, MatchType::None);
            assert_eq!(result.reason, "Empty input value");
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_entry_set_short_circuits() {
        let catalog = CanonicalCatalog::new();
        let stub = Stub::new(SemanticSelection::pick("lic_rn", 0.9, "x"));
        let resolver = Resolver::new(&catalog, stub.clone());

        let result = resolver.resolve(CanonicalKey::LicenseType, "RN").await;
        assert!(result.canonical_id.is_none());
        assert_eq!(result.match_type, MatchType::None);
        assert_eq!(result.reason, "No canonical entries found for licenseType");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_custom_fuzzy_threshold() {
        let catalog = make_catalog();
        let config = ResolverConfig {
            fuzzy_threshold: 0.99,
            ..ResolverConfig::default()
        };
        let resolver = Resolver::with_config(&catalog, Arc::new(DisabledMatcher), config);

        let result = resolver
            .resolve(CanonicalKey::CertType, "Basic Life Suport")
            .await;
        assert_eq!(result.match_type, MatchType::None);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let catalog = make_catalog();
        let resolver = Resolver::new(&catalog, Arc::new(DisabledMatcher));

        for raw in ["LPN", "Licenced Practical Nurse", "Phlebotomist"] {
            let first = resolver.resolve(CanonicalKey::LicenseType, raw).await;
            let second = resolver.resolve(CanonicalKey::LicenseType, raw).await;
            assert_eq!(first.canonical_id, second.canonical_id);
            assert_eq!(first.match_type, second.match_type);
            assert!((first.confidence - second.confidence).abs() < f64::EPSILON);
        }
    }

    #[tokio::test]
    async fn test_resolve_batch_preserves_order() {
        let catalog = make_catalog();
        let resolver = Resolver::new(&catalog, Arc::new(DisabledMatcher));

        let items = vec![
            ResolveRequest::new(CanonicalKey::JobTitle, "ICU Nurse"),
            ResolveRequest::new(CanonicalKey::LicenseType, ""),
            ResolveRequest::new(CanonicalKey::CertType, "ACLS"),
            ResolveRequest::new(CanonicalKey::FacilityName, "Mercy General"),
        ];
        let results = resolver.resolve_batch(&items).await;

        assert_eq!(results.len(), 4);
        let ids: Vec<_> = results
            .iter()
            .map(|r| r.canonical_id.as_ref().map(|id| id.as_str().to_string()))
            .collect();
        assert_eq!(
            ids,
            vec![
                Some("jt_icu_rn".to_string()),
                None,
                Some("cert_acls".to_string()),
                Some("fac_mercy_general".to_string()),
            ]
        );
        for (item, result) in items.iter().zip(&results) {
            assert_eq!(item.key, result.key);
            assert_eq!(item.raw_value, result.raw_value);
        }

        let stats = ResolutionStats::from_results(&results);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.resolved, 3);
        assert_eq!(stats.unresolved, 1);
        assert_eq!(stats.exact, 3);
        assert!(stats.has_unresolved());
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let config = ResolverConfig::default();
        assert!((config.fuzzy_threshold - 0.9).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());

        let partial: ResolverConfig = serde_json::from_str(r#"{"fuzzy_threshold": 0.85}"#).unwrap();
        assert!((partial.fuzzy_threshold - 0.85).abs() < f64::EPSILON);
        assert!((partial.semantic_confidence_cap - 0.7).abs() < f64::EPSILON);

        let bad = ResolverConfig {
            semantic_min_confidence: 1.5,
            ..ResolverConfig::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_resolve_request_accepts_both_spellings() {
        let a: ResolveRequest =
            serde_json::from_str(r#"{"key": "jobTitle", "rawValue": "ICU RN"}"#).unwrap();
        let b: ResolveRequest =
            serde_json::from_str(r#"{"key": "jobTitle", "raw_value": "ICU RN"}"#).unwrap();
        assert_eq!(a, b);
    }
}
