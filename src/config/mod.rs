//! Configuration module for Staylio-Ingest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus reading the API credentials from the process environment.
//!
//! # Example
//!
//! ```no_run
//! use staylio_ingest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Cities to ingest: {}", config.cities.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, ApiCredentials, CityEntry, Config, FetchConfig, OutputConfig, SearchConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_credentials, ENV_API_HOST,
    ENV_API_KEY,
};
