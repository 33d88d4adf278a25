//! sitsit-planner - Command-line entry point
//!
//! Reads the registration export, seats everyone at the given tables and
//! prints the seat charts. Logs go to stderr so `--json` output stays clean.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sitsit_common::config::{load_config, resolve_threshold};
use sitsit_common::Error;
use sitsit_planner::{graph, import, SeatingReport, TableAssigner};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for sitsit-planner
#[derive(Parser, Debug)]
#[command(name = "sitsit-planner")]
#[command(about = "Seat sitsit attendees next to the people they asked for")]
#[command(version)]
struct Args {
    /// Registration export (CSV with first name, surname and group columns)
    csv: PathBuf,

    /// Table sizes, e.g. "14 8 6"
    #[arg(short, long, env = "SITSIT_TABLES")]
    tables: String,

    /// Minimum percentage similarity for two group answers to match
    #[arg(long)]
    threshold: Option<u8>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the seating as JSON instead of text charts
    #[arg(long)]
    json: bool,

    /// Also write the friend graph as Graphviz DOT to this file
    #[arg(long)]
    dot: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing; RUST_LOG overrides the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| loaded.config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &loaded.source {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    match run(&args, &loaded.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(Error::TableOverflow { .. }) => {
                    error!("{}", e);
                    eprintln!("Not enough seats: {}", e);
                }
                _ => {
                    error!("{:#}", e);
                    eprintln!("Error: {:#}", e);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &sitsit_common::TomlConfig) -> Result<()> {
    let affinity = resolve_threshold(args.threshold, config)?;
    info!("Similarity threshold: {}", affinity.threshold);

    let people = import::read_csv(&args.csv)
        .with_context(|| format!("Failed to read attendees from {}", args.csv.display()))?;

    let assigner = TableAssigner::new(affinity);

    if let Some(dot_path) = &args.dot {
        let friends = assigner.resolver().friend_map(&people)?;
        std::fs::write(dot_path, graph::to_dot(&people, &friends))
            .with_context(|| format!("Failed to write friend graph to {}", dot_path.display()))?;
        info!("Friend graph written to {}", dot_path.display());
    }

    let (plan, ids) = assigner.assign(&args.tables, &people)?;
    let report = SeatingReport::new(&plan, &ids);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
