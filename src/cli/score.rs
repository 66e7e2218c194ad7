//! Score command - score one candidate against one requisition.

use std::path::PathBuf;

use clap::Args;

use crate::catalog::roster::Roster;
use crate::cli::{optional_score, OutputFormat};
use crate::core::types::EntryId;
use crate::matching::engine::{MatchResult, MatchingEngine};

/// Arguments for the score command
#[derive(Args)]
pub struct ScoreArgs {
    /// Roster JSON file with candidates and requisitions
    #[arg(short, long, required = true)]
    pub roster: PathBuf,

    /// Candidate ID
    #[arg(short, long, required = true)]
    pub candidate: String,

    /// Requisition ID
    #[arg(short = 'q', long, required = true)]
    pub requisition: String,
}

pub fn run(args: ScoreArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let roster = Roster::load_from_file(&args.roster)?;
    if verbose {
        eprintln!(
            "Loaded roster with {} candidates and {} requisitions",
            roster.candidates.len(),
            roster.requisitions.len()
        );
    }

    let candidate = roster.candidate(&args.candidate)?;
    let requisition = roster.requisition(&args.requisition)?;

    let result = MatchingEngine::new().score(candidate, requisition);

    match format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Tsv => {
            println!("factor\tscore");
            println!("overall\t{}", result.score.overall);
            println!("job_title\t{}", optional_score(result.score.job_title));
            println!("location\t{}", optional_score(result.score.location));
            println!("licenses\t{}", result.score.licenses);
            println!("certifications\t{}", result.score.certifications);
        }
    }

    Ok(())
}

fn join_ids(ids: &[EntryId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter().map(EntryId::as_str).collect::<Vec<_>>().join(", ")
}

fn print_text(result: &MatchResult) {
    println!(
        "Candidate:   {} ({})",
        result.candidate_name, result.candidate_id
    );
    print!("Requisition: {} ({})", result.job_title, result.requisition_id);
    if let Some(facility) = &result.facility_name {
        print!(" at {facility}");
    }
    println!("\n");

    println!("Overall:        {:>3}%", result.score.overall);
    println!("Job title:      {:>3}", optional_score(result.score.job_title));
    println!("Location:       {:>3}", optional_score(result.score.location));
    println!("Licenses:       {:>3}%", result.score.licenses);
    println!("Certifications: {:>3}%", result.score.certifications);

    println!();
    println!("Matched licenses:               {}", join_ids(&result.matched_licenses));
    println!("Missing required licenses:      {}", join_ids(&result.missing_required_licenses));
    println!("Matched certifications:         {}", join_ids(&result.matched_certifications));
    println!(
        "Missing required certifications: {}",
        join_ids(&result.missing_required_certifications)
    );
}
