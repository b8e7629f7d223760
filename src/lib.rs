//! Staylio-Ingest: hotel listing and photo ingestion pipeline
//!
//! This crate fetches hotel listings and high-resolution photos from a
//! travel-search API for a fixed set of cities and persists them into a
//! local SQLite store, skipping hotels that were recorded on earlier runs.

pub mod api;
pub mod config;
pub mod ingest;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for ingestion operations
///
/// Failures inside the ingestion loops (bad records, rate limits,
/// constraint violations) are handled in place and never surface here.
/// This type covers the infrastructure failures that abort a run:
/// configuration loading, database opening, and HTTP client construction.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing environment variable: {0}")]
    MissingEnv(String),
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{ApiCredentials, Config};
pub use output::RunStats;
pub use storage::HotelRecord;
