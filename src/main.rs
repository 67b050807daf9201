//! QA-Harvest main entry point
//!
//! This is the command-line interface for the QA-Harvest site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use qa_harvest::config::{load_config, validate, Config};
use qa_harvest::crawler::{harvest, render_from_checkpoint, CrawlOutcome};
use qa_harvest::output::print_statistics;
use qa_harvest::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// QA-Harvest: turns a website into question/answer training data
///
/// QA-Harvest crawls one site from a seed URL, follows its pagination,
/// extracts question/answer pairs and discussion threads, removes
/// duplicates and writes the result as JSON lines, CSV or plain text.
#[derive(Parser, Debug)]
#[command(name = "qa-harvest")]
#[command(version)]
#[command(about = "Harvests Q&A training data from a website", long_about = None)]
struct Cli {
    /// Seed URL of the crawl
    #[arg(long, value_name = "URL", required_unless_present = "render_checkpoint")]
    url: Option<String>,

    /// Output encoding
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Hard cap on pages processed
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for final and intermediate files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Start a fresh crawl, ignoring any checkpoint
    #[arg(long)]
    fresh: bool,

    /// Write final files from the checkpoint without crawling
    #[arg(long, conflicts_with = "fresh")]
    render_checkpoint: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let outcome = if cli.render_checkpoint {
        render_from_checkpoint(&config).context("Failed to render checkpoint")?
    } else {
        let Some(seed) = cli.url.as_deref() else {
            bail!("--url is required");
        };
        handle_crawl(config, seed, cli.fresh).await?
    };

    print_statistics(&outcome.statistics);
    println!();
    println!("Q&A pairs: {}", outcome.paths.qa.display());
    println!("Discussions: {}", outcome.paths.discussions.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("qa_harvest=info,warn"),
            1 => EnvFilter::new("qa_harvest=debug,info"),
            2 => EnvFilter::new("qa_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and layers command-line flags on top
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the main crawl operation
///
/// Ctrl-C stops the crawl immediately; records checkpointed so far stay on
/// disk and the next run with the same seed picks them up.
async fn handle_crawl(config: Config, seed: &str, fresh: bool) -> anyhow::Result<CrawlOutcome> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume if a checkpoint exists)");
    }

    let output_dir = config.output.directory.clone();

    tokio::select! {
        result = harvest(config, seed, fresh) => match result {
            Ok(outcome) => {
                tracing::info!("Crawl completed successfully");
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Crawl failed: {}", e);
                Err(e.into())
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(
                "Interrupted; checkpoint kept in {}. Run again with --url {} to resume, or --render-checkpoint to write what was collected",
                output_dir,
                seed
            );
            std::process::exit(130);
        }
    }
}
