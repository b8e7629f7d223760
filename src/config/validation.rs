use crate::config::types::{CityEntry, Config, FetchConfig, OutputConfig, SearchConfig};
use crate::ConfigError;
use chrono::NaiveDate;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.api.base_url)?;
    validate_search_config(&config.search)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_cities(&config.cities)?;
    Ok(())
}

/// Validates the API base URL
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http(s), got '{}'",
            base_url
        )));
    }

    Ok(())
}

/// Validates search parameters
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let checkin = parse_iso_date("checkin-date", &config.checkin_date)?;
    let checkout = parse_iso_date("checkout-date", &config.checkout_date)?;

    if checkout <= checkin {
        return Err(ConfigError::Validation(format!(
            "checkout-date ({}) must be after checkin-date ({})",
            config.checkout_date, config.checkin_date
        )));
    }

    if config.adults < 1 {
        return Err(ConfigError::Validation(
            "adults must be >= 1".to_string(),
        ));
    }

    if config.room_quantity < 1 {
        return Err(ConfigError::Validation(
            "room-quantity must be >= 1".to_string(),
        ));
    }

    if config.currency.is_empty() || config.currency.len() > 10 {
        return Err(ConfigError::Validation(format!(
            "currency must be a short code, got '{}'",
            config.currency
        )));
    }

    if config.language.is_empty() {
        return Err(ConfigError::Validation(
            "language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates pacing and retry parameters
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates city entries
///
/// Cities are processed in file order, so the list itself defines the
/// deterministic processing order for a run.
fn validate_cities(cities: &[CityEntry]) -> Result<(), ConfigError> {
    if cities.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[city]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in cities {
        if entry.name.is_empty() {
            return Err(ConfigError::Validation(
                "city name cannot be empty".to_string(),
            ));
        }

        if entry.dest_id.is_empty() {
            return Err(ConfigError::Validation(format!(
                "city '{}' has an empty dest-id",
                entry.name
            )));
        }

        if !seen.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate city name '{}'",
                entry.name
            )));
        }
    }

    Ok(())
}

fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ConfigError::Validation(format!(
            "{} must be an ISO date (YYYY-MM-DD), got '{}'",
            field, value
        ))
    })
}
