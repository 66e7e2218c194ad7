use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::{load_catalog, truncate, OutputFormat};
use crate::core::types::{CanonicalKey, EntryId};

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List canonical entries
    List {
        /// Only list entries for this key
        #[arg(short, long, value_enum)]
        key: Option<CanonicalKey>,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show details of a specific entry
    Show {
        /// Entry ID
        #[arg(required = true)]
        id: String,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalog file to export (defaults to embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { key, catalog } => run_list(key, catalog, format, verbose),
        CatalogCommands::Show { id, catalog } => run_show(&id, catalog, format),
        CatalogCommands::Export { output, catalog } => run_export(output, catalog),
    }
}

fn run_list(
    key_filter: Option<CanonicalKey>,
    catalog_path: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    if verbose {
        eprintln!("Loaded catalog with {} entries", catalog.len());
    }

    let keys: Vec<CanonicalKey> = match key_filter {
        Some(key) => vec![key],
        None => CanonicalKey::ALL.to_vec(),
    };

    let rows: Vec<_> = keys
        .iter()
        .flat_map(|&key| catalog.entries(key).iter().map(move |e| (key, e)))
        .collect();

    match format {
        OutputFormat::Text => {
            let id_width = rows
                .iter()
                .map(|(_, e)| e.id.as_str().len())
                .max()
                .unwrap_or(2)
                .max(2);
            let name_width = rows
                .iter()
                .map(|(_, e)| e.name.chars().count().min(40))
                .max()
                .unwrap_or(4)
                .max(4);

            println!("Canonical Catalog ({} entries)\n", rows.len());
            println!(
                "{:<12} {:<id_w$} {:<name_w$} {:<8} {:>7}",
                "Key",
                "ID",
                "Name",
                "Abbrev",
                "Aliases",
                id_w = id_width,
                name_w = name_width
            );
            println!("{}", "-".repeat(id_width + name_width + 32));

            for (key, e) in &rows {
                println!(
                    "{:<12} {:<id_w$} {:<name_w$} {:<8} {:>7}",
                    key.to_string(),
                    e.id.as_str(),
                    truncate(&e.name, name_width),
                    e.abbreviation.as_deref().unwrap_or("-"),
                    e.aliases.len(),
                    id_w = id_width,
                    name_w = name_width
                );
                if verbose && !e.aliases.is_empty() {
                    println!("  └─ {}", e.aliases.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = rows
                .iter()
                .map(|(key, e)| {
                    serde_json::json!({
                        "key": key,
                        "id": e.id,
                        "name": e.name,
                        "abbreviation": e.abbreviation,
                        "aliases": e.aliases,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("key\tid\tname\tabbreviation\taliases");
            for (key, e) in &rows {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    key,
                    e.id,
                    e.name,
                    e.abbreviation.as_deref().unwrap_or(""),
                    e.aliases.join("|")
                );
            }
        }
    }

    Ok(())
}

fn run_show(id: &str, catalog_path: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    let (key, entry) = catalog
        .find(&EntryId::new(id))
        .ok_or_else(|| anyhow::anyhow!("Entry '{}' not found", id))?;

    match format {
        OutputFormat::Text => {
            println!("Entry: {}\n", entry.name);
            println!("ID:           {}", entry.id);
            println!("Key:          {key}");
            println!(
                "Abbreviation: {}",
                entry.abbreviation.as_deref().unwrap_or("-")
            );
            if !entry.aliases.is_empty() {
                println!("\nAliases:");
                for alias in &entry.aliases {
                    println!("  {alias}");
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key,
                "entry": entry,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("field\tvalue");
            println!("id\t{}", entry.id);
            println!("key\t{key}");
            println!("name\t{}", entry.name);
            println!(
                "abbreviation\t{}",
                entry.abbreviation.as_deref().unwrap_or("")
            );
            for alias in &entry.aliases {
                println!("alias\t{alias}");
            }
        }
    }

    Ok(())
}

fn run_export(output: PathBuf, catalog_path: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    let json = catalog.to_json()?;
    std::fs::write(&output, json)?;

    println!(
        "Exported {} entries to {}",
        catalog.len(),
        output.display()
    );

    Ok(())
}
