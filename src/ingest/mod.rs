//! Ingestion module
//!
//! This module contains the pipeline's control flow, including:
//! - Parsing raw listing items into hotel records
//! - The pagination state machine per city
//! - The per-hotel image-fetch phase

mod orchestrator;
mod parser;

pub use orchestrator::Orchestrator;
pub use parser::parse_hotel;

use crate::config::{ApiCredentials, Config};
use crate::output::RunStats;
use crate::IngestError;

/// Runs a complete ingestion operation
///
/// This is the main entry point. It will:
/// 1. Open the database and record a new run
/// 2. Build the HTTP client
/// 3. Walk every configured city's listing pages
/// 4. Fetch images for hotels stored in this run
/// 5. Return the aggregated run statistics
///
/// # Arguments
///
/// * `config` - The pipeline configuration
/// * `credentials` - API headers read from the environment
/// * `config_hash` - Hash of the configuration file, recorded on the run
pub async fn run_ingest(
    config: &Config,
    credentials: &ApiCredentials,
    config_hash: &str,
) -> Result<RunStats, IngestError> {
    let orchestrator = Orchestrator::new(config, credentials, config_hash)?;
    orchestrator.run().await
}
