//! Rank command - order a pool by match score in either direction.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Subcommand, ValueEnum};

use crate::catalog::roster::{PoolFilter, Roster};
use crate::cli::{optional_score, truncate, OutputFormat};
use crate::core::types::{EntryId, RecordStatus};
use crate::matching::engine::{MatchResult, MatchingConfig, MatchingEngine};

#[derive(Args)]
pub struct RankArgs {
    #[command(subcommand)]
    pub command: RankCommands,
}

#[derive(Subcommand)]
pub enum RankCommands {
    /// Rank candidates for one requisition
    Candidates {
        /// Requisition ID
        #[arg(short = 'q', long, required = true)]
        requisition: String,

        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Rank open requisitions for one candidate
    Requisitions {
        /// Candidate ID
        #[arg(short, long, required = true)]
        candidate: String,

        #[command(flatten)]
        pool: PoolArgs,
    },
}

/// Status filter; `any` admits every status
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    PendingReview,
    Active,
    Archived,
    Any,
}

impl StatusFilter {
    fn as_status(self) -> Option<RecordStatus> {
        match self {
            Self::PendingReview => Some(RecordStatus::PendingReview),
            Self::Active => Some(RecordStatus::Active),
            Self::Archived => Some(RecordStatus::Archived),
            Self::Any => None,
        }
    }
}

#[derive(Args)]
pub struct PoolArgs {
    /// Roster JSON file with candidates and requisitions
    #[arg(short, long, required = true)]
    pub roster: PathBuf,

    /// Only rank records with this status
    #[arg(long, value_enum, default_value = "active")]
    pub status: StatusFilter,

    /// Include requisitions past their expiry
    #[arg(long)]
    pub include_expired: bool,

    /// Minimum overall score (0-100)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: u8,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl PoolArgs {
    fn filter(&self) -> PoolFilter {
        PoolFilter {
            status: self.status.as_status(),
            include_expired: self.include_expired,
        }
    }

    fn engine(&self) -> MatchingEngine {
        MatchingEngine::with_config(MatchingConfig {
            min_score: self.min_score,
            limit: self.limit,
        })
    }
}

/// Which side of the pairing is being ranked
#[derive(Clone, Copy, PartialEq, Eq)]
enum Ranked {
    Candidates,
    Requisitions,
}

pub fn run(args: RankArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (results, ranked) = match args.command {
        RankCommands::Candidates { requisition, pool } => {
            let roster = load_roster(&pool, verbose)?;
            let requisition = roster.requisition(&requisition)?;
            let candidates = roster.candidate_pool(&pool.filter());
            (
                pool.engine().rank_candidates_for(requisition, &candidates),
                Ranked::Candidates,
            )
        }
        RankCommands::Requisitions { candidate, pool } => {
            let roster = load_roster(&pool, verbose)?;
            let candidate = roster.candidate(&candidate)?;
            let requisitions = roster.requisition_pool(&pool.filter(), Utc::now());
            (
                pool.engine().rank_requisitions_for(candidate, &requisitions),
                Ranked::Requisitions,
            )
        }
    };

    match format {
        OutputFormat::Text => print_text(&results, ranked),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Tsv => print_tsv(&results),
    }

    Ok(())
}

fn load_roster(pool: &PoolArgs, verbose: bool) -> anyhow::Result<Roster> {
    let roster = Roster::load_from_file(&pool.roster)?;
    if verbose {
        eprintln!(
            "Loaded roster with {} candidates and {} requisitions",
            roster.candidates.len(),
            roster.requisitions.len()
        );
    }
    Ok(roster)
}

/// ID and display name of the ranked record
fn subject(r: &MatchResult, ranked: Ranked) -> (&str, &str) {
    match ranked {
        Ranked::Candidates => (&r.candidate_id, &r.candidate_name),
        Ranked::Requisitions => (&r.requisition_id, &r.job_title),
    }
}

fn print_text(results: &[MatchResult], ranked: Ranked) {
    if results.is_empty() {
        println!("No matches found.");
        return;
    }

    let id_width = results
        .iter()
        .map(|r| subject(r, ranked).0.len())
        .max()
        .unwrap_or(2)
        .max(2);
    let name_width = results
        .iter()
        .map(|r| subject(r, ranked).1.chars().count().min(30))
        .max()
        .unwrap_or(4)
        .max(4);

    println!(
        "{:>4} {:<id_w$} {:<name_w$} {:>7} {:>5} {:>8} {:>8} {:>6}  Missing",
        "Rank",
        "ID",
        "Name",
        "Overall",
        "Title",
        "Location",
        "Licenses",
        "Certs",
        id_w = id_width,
        name_w = name_width
    );
    println!("{}", "-".repeat(id_width + name_width + 60));

    for (i, r) in results.iter().enumerate() {
        let (id, name) = subject(r, ranked);
        let missing: Vec<&str> = r
            .missing_required_licenses
            .iter()
            .chain(&r.missing_required_certifications)
            .map(|id| id.as_str())
            .collect();
        println!(
            "{:>4} {:<id_w$} {:<name_w$} {:>7} {:>5} {:>8} {:>8} {:>6}  {}",
            i + 1,
            id,
            truncate(name, name_width),
            r.score.overall,
            optional_score(r.score.job_title),
            optional_score(r.score.location),
            r.score.licenses,
            r.score.certifications,
            if missing.is_empty() {
                "-".to_string()
            } else {
                missing.join(", ")
            },
            id_w = id_width,
            name_w = name_width
        );
    }
}

fn print_tsv(results: &[MatchResult]) {
    println!("candidate_id\tcandidate_name\trequisition_id\tjob_title\toverall\tjob_title_score\tlocation\tlicenses\tcertifications\tmissing_licenses\tmissing_certifications");
    for r in results {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.candidate_id,
            r.candidate_name,
            r.requisition_id,
            r.job_title,
            r.score.overall,
            optional_score(r.score.job_title),
            optional_score(r.score.location),
            r.score.licenses,
            r.score.certifications,
            join_ids(&r.missing_required_licenses),
            join_ids(&r.missing_required_certifications)
        );
    }
}

fn join_ids(ids: &[EntryId]) -> String {
    ids.iter().map(EntryId::as_str).collect::<Vec<_>>().join(",")
}
