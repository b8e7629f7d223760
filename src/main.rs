//! Staylio-Ingest main entry point
//!
//! This is the command-line interface for the hotel ingestion pipeline.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use staylio_ingest::config::{load_config_with_hash, load_credentials, ENV_API_HOST, ENV_API_KEY};
use staylio_ingest::ingest::run_ingest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Staylio-Ingest: hotel listing and photo ingestion
///
/// Fetches hotel listings and high-resolution photos from a travel-search
/// API for a fixed set of cities and persists them into a local SQLite
/// store, skipping hotels recorded on earlier runs.
#[derive(Parser, Debug)]
#[command(name = "staylio-ingest")]
#[command(version = "1.0.0")]
#[command(about = "Hotel listing and photo ingestion pipeline", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be ingested without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load a .env file if one is present; real environment wins
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_ingest(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("staylio_ingest=info,warn"),
            1 => EnvFilter::new("staylio_ingest=debug,info"),
            2 => EnvFilter::new("staylio_ingest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &staylio_ingest::config::Config) {
    println!("=== Staylio-Ingest Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!(
        "  Credentials: {}",
        if load_credentials().is_ok() {
            "present"
        } else {
            "MISSING (set RAPIDAPI_HOST and RAPIDAPI_KEY)"
        }
    );

    println!("\nSearch:");
    println!(
        "  Stay: {} -> {}",
        config.search.checkin_date, config.search.checkout_date
    );
    println!(
        "  Guests: {} adults, children ages {}, {} room(s)",
        config.search.adults, config.search.children_ages, config.search.room_quantity
    );
    println!(
        "  Currency: {}, language: {}",
        config.search.currency, config.search.language
    );

    println!("\nFetch:");
    println!("  Pacing interval: {}ms", config.fetch.pacing_interval_ms);
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nCities ({}):", config.cities.len());
    for city in &config.cities {
        println!("  - {} (dest id {})", city.name, city.dest_id);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &staylio_ingest::config::Config) -> anyhow::Result<()> {
    use staylio_ingest::output::{load_statistics, print_statistics};
    use staylio_ingest::storage::SqliteStorage;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main ingestion operation
async fn handle_ingest(
    config: &staylio_ingest::config::Config,
    config_hash: &str,
) -> anyhow::Result<()> {
    let credentials = load_credentials().with_context(|| {
        format!(
            "API credentials missing; set {} and {}",
            ENV_API_HOST, ENV_API_KEY
        )
    })?;

    println!("{}", "=".repeat(60));
    println!("STAYLIO HOTEL DATA FETCHER");
    println!("{}", "=".repeat(60));
    println!("Started at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!();

    let stats = run_ingest(config, &credentials, config_hash)
        .await
        .context("ingestion run failed")?;

    println!();
    staylio_ingest::output::print_run_summary(&stats);
    println!(
        "Completed at: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}", "=".repeat(60));

    Ok(())
}
