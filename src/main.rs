//! Life Underwriting CLI
//!
//! Quotes a single applicant, underwrites a CSV batch, or prints the active
//! rulebook.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

use life_underwriting::applicant::{load_applicant_json, load_applicants_csv, load_applicants_lenient};
use life_underwriting::underwriting::render_quote;
use life_underwriting::{BatchUnderwriter, Rulebook, UnderwritingEngine};

/// Life insurance underwriting rules engine
#[derive(Parser, Debug)]
#[command(name = "life_underwriting", version, about)]
struct Cli {
    /// Custom rulebook JSON (defaults to the reference tables)
    #[arg(long, env = "UW_RULEBOOK", global = true)]
    rulebook: Option<PathBuf>,

    /// Reference date for attained age, YYYY-MM-DD (defaults to today)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Quote one applicant from an extraction JSON payload
    Quote {
        #[arg(long)]
        applicant: PathBuf,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Underwrite every row of a CSV file
    Batch {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Skip invalid rows instead of stopping at the first one
        #[arg(long)]
        skip_invalid: bool,
    },
    /// Print the active rulebook as JSON
    Rulebook,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let rulebook = load_rulebook(cli.rulebook.as_deref())?;
    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());

    match cli.command {
        Commands::Quote { applicant, json } => {
            let record = load_applicant_json(&applicant)
                .with_context(|| format!("Failed to load applicant from {}", applicant.display()))?;
            let result = UnderwritingEngine::new(rulebook).underwrite(&record, as_of);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                if let Some(name) = &record.name {
                    println!("Applicant: {}", name);
                }
                println!("As of {}", as_of);
                print!("{}", render_quote(&result));
            }
        }
        Commands::Batch { input, output, skip_invalid } => {
            let applicants = if skip_invalid {
                let file = File::open(&input)
                    .with_context(|| format!("Failed to open {}", input.display()))?;
                load_applicants_lenient(file)
            } else {
                load_applicants_csv(&input)
                    .with_context(|| format!("Failed to load applicants from {}", input.display()))?
            };
            info!("Loaded {} applicants from {}", applicants.len(), input.display());

            let runner = BatchUnderwriter::new(rulebook, as_of);
            let rows = runner.summarize(&applicants);

            let mut writer = csv::Writer::from_path(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;

            println!("Wrote {} quotes to {}", rows.len(), output.display());
        }
        Commands::Rulebook => {
            println!("{}", serde_json::to_string_pretty(&rulebook)?);
        }
    }

    Ok(())
}

fn load_rulebook(path: Option<&Path>) -> Result<Rulebook> {
    match path {
        Some(path) => {
            let rulebook = Rulebook::from_json_path(path)
                .with_context(|| format!("Failed to load rulebook from {}", path.display()))?;
            info!("Using rulebook from {}", path.display());
            Ok(rulebook)
        }
        None => Ok(Rulebook::standard()),
    }
}
