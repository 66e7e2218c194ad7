//! Command-line interface for credmatch.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **resolve**: Resolve raw values onto canonical entries
//! - **score**: Score one candidate against one requisition
//! - **rank**: Rank candidates for a requisition, or requisitions for a candidate
//! - **catalog**: List, show, or export the canonical catalog
//!
//! ## Usage
//!
//! ```text
//! # Resolve a few license spellings
//! credmatch resolve --key license-type "RN" "Registred Nurse" "L.P.N."
//!
//! # Resolve a batch file without calling the semantic service
//! credmatch resolve --input values.json --no-semantic --format json
//!
//! # Best candidates for a requisition
//! credmatch rank candidates --roster roster.json --requisition req_42 -n 10
//!
//! # Browse the catalog
//! credmatch catalog list --key cert-type
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::catalog::store::CanonicalCatalog;

pub mod catalog;
pub mod rank;
pub mod resolve;
pub mod score;

#[derive(Parser)]
#[command(name = "credmatch")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Canonicalize healthcare credentials and match candidates to requisitions")]
#[command(
    long_about = "credmatch maps free-text facility names, license types, certification types and job titles onto a canonical catalog, then scores candidates against job requisitions.\n\nResolution tries, in order:\n- Exact matches on abbreviation, name or alias\n- Fuzzy matches by edit distance\n- A semantic matcher (OpenAI-compatible, needs OPENAI_API_KEY)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve raw values onto canonical entries
    Resolve(resolve::ResolveArgs),

    /// Score one candidate against one requisition
    Score(score::ScoreArgs),

    /// Rank candidates or requisitions by match score
    Rank(rank::RankArgs),

    /// Manage the canonical catalog
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a catalog file, or the embedded catalog when no path is given
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<CanonicalCatalog> {
    let catalog = match path {
        Some(path) => CanonicalCatalog::load_from_file(path)?,
        None => CanonicalCatalog::load_embedded()?,
    };
    Ok(catalog)
}

/// Shorten `s` to at most `max` characters, marking the cut with "..."
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Render an optional 0-100 score, "-" when the factor was not evaluated
pub fn optional_score(score: Option<u8>) -> String {
    score.map_or_else(|| "-".to_string(), |s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Registered Nurse", 40), "Registered Nurse");
        assert_eq!(truncate("Registered Nurse", 10), "Registe...");
    }

    #[test]
    fn test_optional_score() {
        assert_eq!(optional_score(Some(80)), "80");
        assert_eq!(optional_score(None), "-");
    }
}
