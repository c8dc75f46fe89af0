//! Reel-Harvest main entry point
//!
//! This is the command-line interface for the Reel-Harvest film-listing harvester.

use anyhow::Context;
use clap::Parser;
use reel_harvest::config::{load_config_with_hash, validate, Config};
use reel_harvest::crawler::{crawl, repair};
use reel_harvest::output::{load_statistics, print_statistics};
use reel_harvest::storage::{open_store, CsvStore};
use reel_harvest::ListingSource;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Reel-Harvest: a polite film-listing harvester
///
/// Reel-Harvest walks paginated film listings, resolves each title's detail
/// page into a download link, and appends the results to a CSV file. A repair
/// pass revisits failed and incomplete records.
#[derive(Parser, Debug)]
#[command(name = "reel-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite film-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// First listing page whose items are processed
    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    start_page: u32,

    /// Revisit failed and incomplete records instead of crawling
    #[arg(long, conflicts_with_all = ["stats", "dry_run"])]
    repair: bool,

    /// Show statistics from the record store and exit
    #[arg(long, conflicts_with_all = ["repair", "dry_run"])]
    stats: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["repair", "stats"])]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Errors are reported here and nowhere else
    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Runs the selected mode
async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load(&cli).context("failed to load configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, cli.start_page)
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.repair {
        handle_repair(config).await
    } else {
        handle_crawl(config, cli.start_page).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reel_harvest=info,warn"),
            1 => EnvFilter::new("reel_harvest=debug,info"),
            2 => EnvFilter::new("reel_harvest=trace,debug"),
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

/// Loads the configuration file, or validated defaults when none is given
fn load(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, start_page: u32) -> anyhow::Result<()> {
    println!("=== Reel-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!(
        "  Encoding: {} (fallback {})",
        config.site.encoding, config.site.fallback_encoding
    );

    println!("\nFetch:");
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!(
        "  Backoff: {}ms doubling, +{}ms jitter",
        config.fetch.base_delay_ms, config.fetch.jitter_ms
    );
    println!("  Timeout: {}s", config.fetch.timeout_secs);

    println!("\nDelays:");
    println!("  Detail: {}ms", config.delays.detail_ms);
    println!("  Page: {}ms", config.delays.page_ms);
    println!("  Source: {}ms", config.delays.source_ms);
    println!("  Repair: {}ms", config.delays.repair_ms);

    println!("\nOutput:");
    println!("  Movies: {}", config.output.movies_path);
    println!("  Failed: {}", config.output.failed_path);

    println!("\nSources ({}):", config.sources.len());
    for source in config.sources.iter().map(|s| ListingSource::new(s.as_str())) {
        println!("  - {}", source.page_url(1));
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} sources starting at page {}",
        config.sources.len(),
        start_page
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the record store
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Movies: {}", config.output.movies_path);
    println!("Failed: {}\n", config.output.failed_path);

    let store = CsvStore::new(&config.output.movies_path, &config.output.failed_path);
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --repair mode
async fn handle_repair(config: Config) -> anyhow::Result<()> {
    let store = open_store(&config.output)?;

    tracing::info!(
        "Repairing {} using {}",
        config.output.movies_path,
        config.output.failed_path
    );

    let summary = repair(config, store).await.context("repair pass failed")?;
    println!("{}", summary);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, start_page: u32) -> anyhow::Result<()> {
    let store = open_store(&config.output)?;

    tracing::info!(
        "Sources: {}, output: {}",
        config.sources.len(),
        config.output.movies_path
    );

    let summary = crawl(config, store, start_page)
        .await
        .context("crawl failed")?;
    println!("{}", summary);
    Ok(())
}
