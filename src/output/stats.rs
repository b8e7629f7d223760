//! Run statistics and store reporting
//!
//! The [`RunStats`] counters are aggregated by the orchestrator during a
//! run and printed as the console summary. [`StoreStatistics`] is the
//! database-wide view behind the `--stats` mode.

use crate::storage::{RunRecord, Storage};
use crate::IngestError;

/// Counters aggregated over one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Hotels inserted during this run
    pub hotels_stored: u64,

    /// Hotels skipped because their id was already in the store
    pub hotels_skipped: u64,

    /// Listing pages processed (pages with the expected payload shape)
    pub pages_processed: u64,

    /// Image URLs written during the image phase
    pub images_stored: u64,

    /// Cities processed
    pub cities_processed: u64,

    /// Listings fetches that failed or lacked the expected payload shape
    ///
    /// Ordinary empty pages and unparsable items do not count here.
    pub errors: u64,
}

/// Prints the end-of-run summary block
pub fn print_run_summary(stats: &RunStats) {
    println!("{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total hotels stored: {}", stats.hotels_stored);
    println!(
        "Total hotels skipped (already exist): {}",
        stats.hotels_skipped
    );
    println!("Total images stored: {}", stats.images_stored);
    println!("Total pages processed: {}", stats.pages_processed);
    println!("Total cities processed: {}", stats.cities_processed);
    println!("Total errors: {}", stats.errors);
}

/// Database-wide statistics for the `--stats` mode
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Total hotel rows
    pub total_hotels: u64,

    /// Hotel counts per city, largest first
    pub hotels_by_city: Vec<(String, u64)>,

    /// Hotels with an image row
    pub image_rows: u64,

    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStatistics, IngestError> {
    let total_hotels = storage.count_hotels()?;
    let hotels_by_city = storage.count_hotels_by_city()?;
    let image_rows = storage.count_image_rows()?;
    let latest_run = storage.get_latest_run()?;

    Ok(StoreStatistics {
        total_hotels,
        hotels_by_city,
        image_rows,
        latest_run,
    })
}

/// Prints store statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");

    println!("Overview:");
    println!("  Total hotels: {}", stats.total_hotels);
    println!("  Hotels with images: {}", stats.image_rows);
    println!();

    if !stats.hotels_by_city.is_empty() {
        println!("Hotels by City:");
        for (city, count) in &stats.hotels_by_city {
            let percentage = if stats.total_hotels > 0 {
                (*count as f64 / stats.total_hotels as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", city, count, percentage);
        }
        println!();
    }

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  Id: {}", run.id);
            println!("  Started: {}", run.started_at);
            println!(
                "  Finished: {}",
                run.finished_at.as_deref().unwrap_or("(still running)")
            );
            println!("  Status: {}", run.status.to_db_string());
            println!("  Config hash: {}", run.config_hash);
        }
        None => println!("No ingestion runs recorded."),
    }
}
