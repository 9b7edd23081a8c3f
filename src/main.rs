//! robots-history main entry point
//!
//! This is the command-line interface for the robots.txt time machine.

use clap::{ArgAction, Parser};
use robots_history::config::{load_config_with_hash, validate, validate_year, Config};
use robots_history::history::{Coordinator, Limit, LogProgress, Mode, SelectionPolicy};
use robots_history::output::{JsonDirectorySink, ResultSink, StdoutSink};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// robots-history: a robots.txt time machine
///
/// Reads hosts or URLs (arguments, or one per line on stdin), pulls archived
/// captures of each site's robots.txt, and prints either every rule URL ever
/// seen or a timeline of rule changes.
#[derive(Parser, Debug)]
#[command(name = "robots-history")]
#[command(version)]
#[command(about = "Reconstruct the history of a site's robots.txt", long_about = None)]
struct Cli {
    /// Hosts or URLs to process; read from stdin when omitted
    #[arg(value_name = "SITE")]
    sites: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of captures per site, -1 for unlimited
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Take the most recent captures instead of spreading over the history
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    recent: Option<bool>,

    /// Print a timeline of changes instead of the flat path list
    #[arg(long)]
    timeline: bool,

    /// Restrict the timeline to one year; overrides --limit and --recent
    #[arg(long, requires = "timeline")]
    year: Option<i32>,

    /// Directory for JSON and raw robots.txt output
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Number of concurrent capture fetches
    #[arg(long)]
    workers: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    let policy = SelectionPolicy {
        limit: Limit::from_flag(config.selection.limit),
        recent: config.selection.recent,
        year: cli.year,
    };
    let mode = if cli.timeline {
        Mode::Timeline
    } else {
        Mode::Paths
    };

    let coordinator =
        Coordinator::from_config(&config, policy)?.with_progress(Arc::new(LogProgress::default()));

    let sink: Box<dyn ResultSink> = match &config.output.directory {
        Some(dir) => {
            tracing::info!("Writing results to {}", dir);
            Box::new(JsonDirectorySink::new(dir))
        }
        None => Box::new(StdoutSink::stdout()),
    };

    let inputs = if cli.sites.is_empty() {
        read_stdin_sites()?
    } else {
        cli.sites.clone()
    };

    let summary = coordinator.run(&inputs, mode, sink.as_ref()).await;
    tracing::info!(
        "Done: {} sites processed, {} failed",
        summary.processed,
        summary.failed.len()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("robots_history=info,warn"),
            1 => EnvFilter::new("robots_history=debug,info"),
            2 => EnvFilter::new("robots_history=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and
/// validates the result
fn load_configuration(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(limit) = cli.limit {
        config.selection.limit = limit;
    }
    if let Some(recent) = cli.recent {
        config.selection.recent = recent;
    }
    if let Some(workers) = cli.workers {
        config.archive.workers = workers;
    }
    if let Some(dir) = &cli.output {
        config.output.directory = Some(dir.display().to_string());
    }

    validate(&config)?;
    if let Some(year) = cli.year {
        validate_year(year)?;
    }

    Ok(config)
}

/// Reads one site per line from stdin, skipping blank lines
fn read_stdin_sites() -> std::io::Result<Vec<String>> {
    let stdin = std::io::stdin();
    let mut sites = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            sites.push(line.to_string());
        }
    }
    Ok(sites)
}
