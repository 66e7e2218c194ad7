//! Resolve command - map raw values onto canonical catalog entries.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::canonical::resolver::{ResolutionStats, ResolveRequest, Resolver, ResolverConfig};
use crate::canonical::semantic::{DisabledMatcher, OpenAiMatcher, SemanticMatcher, DEFAULT_MODEL};
use crate::cli::{load_catalog, truncate, OutputFormat};
use crate::core::entry::CanonicalResult;
use crate::core::types::CanonicalKey;

/// Arguments for the resolve command
#[derive(Args)]
pub struct ResolveArgs {
    /// Raw values to resolve
    #[arg(required_unless_present = "input", requires = "key")]
    pub values: Vec<String>,

    /// Which domain the values belong to
    #[arg(short, long, value_enum)]
    pub key: Option<CanonicalKey>,

    /// JSON file with a list of {"key", "raw_value"} objects
    #[arg(short, long, conflicts_with_all = ["values", "key"])]
    pub input: Option<PathBuf>,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// JSON file with resolver thresholds
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip the semantic stage (exact and fuzzy only)
    #[arg(long)]
    pub no_semantic: bool,

    /// Chat model used by the semantic stage
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,
}

pub fn run(args: ResolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    if verbose {
        eprintln!("Loaded catalog with {} entries", catalog.len());
    }

    let config = match &args.config {
        Some(path) => ResolverConfig::load_from_file(path)?,
        None => ResolverConfig::default(),
    };

    let requests = match (&args.input, args.key) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<Vec<ResolveRequest>>(&content)?
        }
        (None, Some(key)) => args
            .values
            .iter()
            .map(|v| ResolveRequest::new(key, v.as_str()))
            .collect(),
        (None, None) => anyhow::bail!("--key is required when resolving values"),
    };

    let matcher = semantic_matcher(args.no_semantic, &args.model);
    let resolver = Resolver::with_config(&catalog, matcher, config);

    let runtime = tokio::runtime::Runtime::new()?;
    let results = runtime.block_on(resolver.resolve_batch(&requests));
    let stats = ResolutionStats::from_results(&results);

    match format {
        OutputFormat::Text => print_text(&results, &stats),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "results": results,
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("key\traw_value\tcanonical_id\tcanonical_value\tmatch_type\tconfidence\treason");
            for r in &results {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{:.3}\t{}",
                    r.key,
                    r.raw_value,
                    r.canonical_id.as_ref().map_or("", |id| id.as_str()),
                    r.canonical_value.as_deref().unwrap_or(""),
                    r.match_type,
                    r.confidence,
                    r.reason
                );
            }
        }
    }

    Ok(())
}

fn semantic_matcher(no_semantic: bool, model: &str) -> Arc<dyn SemanticMatcher> {
    if no_semantic {
        return Arc::new(DisabledMatcher);
    }
    match OpenAiMatcher::from_env() {
        Some(matcher) => Arc::new(matcher.with_model(model)),
        None => {
            tracing::warn!("OPENAI_API_KEY is not set; semantic matching disabled");
            Arc::new(DisabledMatcher)
        }
    }
}

fn print_text(results: &[CanonicalResult], stats: &ResolutionStats) {
    let raw_width = results
        .iter()
        .map(|r| r.raw_value.chars().count().min(30))
        .max()
        .unwrap_or(5)
        .max(5);
    let id_width = results
        .iter()
        .filter_map(|r| r.canonical_id.as_ref())
        .map(|id| id.as_str().len())
        .max()
        .unwrap_or(12)
        .max(12);

    println!(
        "{:<raw_w$} {:<id_w$} {:<6} {:>6}  Reason",
        "Value",
        "Canonical ID",
        "Type",
        "Conf",
        raw_w = raw_width,
        id_w = id_width
    );
    println!("{}", "-".repeat(raw_width + id_width + 30));

    for r in results {
        println!(
            "{:<raw_w$} {:<id_w$} {:<6} {:>6.2}  {}",
            truncate(&r.raw_value, raw_width),
            r.canonical_id.as_ref().map_or("-", |id| id.as_str()),
            r.match_type.to_string(),
            r.confidence,
            r.reason,
            raw_w = raw_width,
            id_w = id_width
        );
    }

    println!(
        "\nResolved {}/{} (exact: {}, fuzzy: {}, ai: {})",
        stats.resolved, stats.total, stats.exact, stats.fuzzy, stats.ai
    );
    if stats.has_unresolved() {
        println!("{} value(s) need manual review", stats.unresolved);
    }
}
