//! Output module for run summaries and store reports

pub mod stats;

pub use stats::{load_statistics, print_run_summary, print_statistics, RunStats, StoreStatistics};
