//! Procchain CLI
//!
//! Command-line front end for the shortest process-chain search:
//! - `find`: shortest chain between two items over inline and/or file rules
//! - `check`: strictly validate a rules file and summarize it
//! - `demo`: run the built-in sample catalogs

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use procchain_core::{shortest_chain, Catalog, CatalogStats, SearchOptions, SearchStatus};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

mod demo;
mod logging;

#[derive(Parser)]
#[command(name = "procchain")]
#[command(
    author,
    version,
    about = "Find the shortest chain of processes that turns one item into another"
)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the shortest process chain from START to END.
    Find {
        /// Item to start from
        start: String,
        /// Item to produce
        end: String,
        /// Inline rule `name:from:to` (repeatable; loaded before the file)
        #[arg(short, long = "rule", value_name = "RULE")]
        rules: Vec<String>,
        /// Rules file: one `name:from:to` per line, `#` comments allowed
        #[arg(short = 'f', long, value_name = "PATH")]
        rules_file: Option<PathBuf>,
        /// Treat chains longer than this as unreachable
        #[arg(long, value_name = "N")]
        max_steps: Option<usize>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate a rules file and print a summary.
    Check {
        /// Rules file
        input: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the built-in sample catalogs.
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FindReport {
    start: String,
    end: String,
    status: SearchStatus,
    options: SearchOptions,
    steps: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    path: String,
    #[serde(flatten)]
    stats: CatalogStats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Find {
            start,
            end,
            rules,
            rules_file,
            max_steps,
            json,
        } => {
            let catalog = load_catalog(&rules, rules_file.as_deref())?;
            let options = SearchOptions { max_steps };
            let report = run_find(&start, &end, &catalog, &options);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_find_report(&report);
            }
        }
        Commands::Check { input, json } => {
            cmd_check(&input, json)?;
        }
        Commands::Demo => {
            cmd_demo();
        }
    }

    Ok(())
}

/// Inline rules first, then the rules file, in order.
fn load_catalog(rules: &[String], rules_file: Option<&Path>) -> Result<Catalog> {
    let mut catalog = Catalog::parse(rules).context("invalid --rule")?;

    if let Some(path) = rules_file {
        let from_file = read_rules_file(path)?;
        catalog.extend(from_file);
    }

    tracing::info!(rules = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn read_rules_file(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    Catalog::parse_text(&text).with_context(|| format!("invalid rules file `{}`", path.display()))
}

fn run_find(start: &str, end: &str, catalog: &Catalog, options: &SearchOptions) -> FindReport {
    let outcome = shortest_chain(start, end, catalog, options);
    let status = outcome.status();
    FindReport {
        start: start.to_string(),
        end: end.to_string(),
        status,
        options: options.clone(),
        steps: outcome.into_names(catalog),
    }
}

fn print_find_report(report: &FindReport) {
    match report.status {
        SearchStatus::Found => {
            eprintln!(
                "{} {} step(s) from `{}` to `{}`",
                "found".green().bold(),
                report.steps.len(),
                report.start,
                report.end
            );
            for step in &report.steps {
                println!("{step}");
            }
        }
        SearchStatus::Identity => {
            eprintln!(
                "{} `{}` is already `{}`; no processes needed",
                "ok".green().bold(),
                report.start,
                report.end
            );
        }
        SearchStatus::Unreachable => {
            eprintln!(
                "{} no chain from `{}` to `{}`",
                "unreachable".yellow().bold(),
                report.start,
                report.end
            );
        }
    }
}

fn cmd_check(input: &Path, json: bool) -> Result<()> {
    let catalog = read_rules_file(input)?;
    let report = CheckReport {
        path: input.display().to_string(),
        stats: catalog.stats(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Checked".green().bold(), report.path);
    println!("  Rules: {}", report.stats.rules);
    println!("  Items: {}", report.stats.labels);
    if report.stats.self_loops > 0 {
        println!("  Self-loops: {}", report.stats.self_loops.to_string().yellow());
    }
    if report.stats.duplicates > 0 {
        println!("  Duplicates: {}", report.stats.duplicates.to_string().yellow());
    }
    Ok(())
}

fn cmd_demo() {
    for case in demo::cases() {
        let catalog = Catalog::from_entries_lossy(case.rules);
        let report = run_find(case.start, case.end, &catalog, &SearchOptions::default());

        println!(
            "{} {} ({} -> {})",
            "Demo".cyan().bold(),
            case.title,
            case.start,
            case.end
        );
        if report.steps.is_empty() {
            println!("  [] ({})", report.status);
        } else {
            println!("  [{}]", report.steps.join(", "));
        }
    }
}
