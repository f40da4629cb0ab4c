//! Sumi-Mirror main entry point
//!
//! This is the command-line interface for the Sumi-Mirror site mirror.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_mirror::config::{load_config, validate, validate_seed, Config};
use sumi_mirror::crawler::Coordinator;
use sumi_mirror::output::print_statistics;
use sumi_mirror::url::{map_url_to_path, Seed};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Mirror: a prefix-bounded website mirror
///
/// Sumi-Mirror fetches a site starting at SEED, follows every link that starts
/// with SEED and stores each page under OUTPUT_DIR. Pages already on disk are
/// never fetched again, so rerunning an interrupted mirror resumes it.
#[derive(Parser, Debug)]
#[command(name = "sumi-mirror")]
#[command(version = "1.0.0")]
#[command(about = "A prefix-bounded website mirror", long_about = None)]
struct Cli {
    /// URL to start from; only links starting with it are followed
    #[arg(value_name = "SEED")]
    seed: String,

    /// Directory the mirror is written to
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Number of pages processed in parallel (overrides the config file)
    #[arg(short = 'j', long)]
    parallelism: Option<u32>,

    /// Whole-request timeout in seconds (overrides the config file)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the inputs and show what would be mirrored without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let seed = validate_seed(&cli.seed)?;

    if cli.dry_run {
        return handle_dry_run(&seed, &cli.output_dir, &config);
    }

    handle_mirror(seed, cli.output_dir, &config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_mirror=info,warn"),
            1 => EnvFilter::new("sumi_mirror=debug,info"),
            2 => EnvFilter::new("sumi_mirror=trace,debug"),
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

/// Loads the config file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(parallelism) = cli.parallelism {
        config.crawler.max_parallelism = parallelism;
    }

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = Some(timeout);
    }

    validate(&config).context("invalid command-line settings")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings and exits
fn handle_dry_run(seed: &Seed, output_dir: &std::path::Path, config: &Config) -> anyhow::Result<()> {
    println!("=== Sumi-Mirror Dry Run ===\n");

    println!("Seed: {}", seed);
    println!("  Links followed: anything starting with {}", seed);
    println!(
        "  Seed page stored at: {}",
        map_url_to_path(seed.as_str(), seed.as_str(), output_dir)?.display()
    );

    println!("\nCrawler Configuration:");
    println!("  Max parallelism: {}", config.crawler.max_parallelism);

    println!("\nHTTP:");
    match config.http.timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }
    match config.http.connect_timeout_secs {
        Some(secs) => println!("  Connect timeout: {}s", secs),
        None => println!("  Connect timeout: none"),
    }

    println!("\nOutput directory: {}", output_dir.display());
    if output_dir.exists() {
        println!("  Exists; pages already there will be reused, not fetched");
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main mirror operation
async fn handle_mirror(seed: Seed, output_dir: PathBuf, config: &Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping");
            on_interrupt.cancel();
        }
    });

    let coordinator = Coordinator::from_config(seed, output_dir, config, cancel)?;

    match coordinator.run().await {
        Ok(summary) => {
            print_statistics(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            tracing::info!("Files already written are kept; rerun the same command to resume");
            Err(e.into())
        }
    }
}
