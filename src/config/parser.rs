use crate::config::types::{ApiCredentials, Config};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable holding the x-rapidapi-host header value
pub const ENV_API_HOST: &str = "RAPIDAPI_HOST";

/// Environment variable holding the x-rapidapi-key header value
pub const ENV_API_KEY: &str = "RAPIDAPI_KEY";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Recorded against each run so a database can be traced back to the
/// exact configuration that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Reads the API authentication headers from the process environment
///
/// Both values are required; neither has a default. A `.env` file loaded
/// at startup (via dotenvy) is the usual source during development.
pub fn load_credentials() -> Result<ApiCredentials, ConfigError> {
    let host = std::env::var(ENV_API_HOST)
        .map_err(|_| ConfigError::MissingEnv(ENV_API_HOST.to_string()))?;
    let key =
        std::env::var(ENV_API_KEY).map_err(|_| ConfigError::MissingEnv(ENV_API_KEY.to_string()))?;

    if host.trim().is_empty() {
        return Err(ConfigError::MissingEnv(ENV_API_HOST.to_string()));
    }
    if key.trim().is_empty() {
        return Err(ConfigError::MissingEnv(ENV_API_KEY.to_string()));
    }

    Ok(ApiCredentials { host, key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[api]
base-url = "https://booking-com15.p.rapidapi.com/api/v1"

[search]
checkin-date = "2025-11-20"
checkout-date = "2025-11-25"

[fetch]
pacing-interval-ms = 3000
max-retries = 3

[output]
database-path = "./staylio.db"

[[city]]
name = "pune"
dest-id = "-2108361"

[[city]]
name = "mumbai"
dest-id = "-2092174"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.search.checkin_date, "2025-11-20");
        assert_eq!(config.fetch.max_retries, 3);
        assert_eq!(config.cities.len(), 2);
        assert_eq!(config.cities[0].name, "pune");
        assert_eq!(config.cities[0].dest_id, "-2108361");
    }

    #[test]
    fn test_defaults_applied() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.search.adults, 2);
        assert_eq!(config.search.children_ages, "0,17");
        assert_eq!(config.search.room_quantity, 1);
        assert_eq!(config.search.currency, "INR");
        assert_eq!(config.search.language, "en-us");
        assert_eq!(config.fetch.request_timeout_secs, 30);
        assert_eq!(config.fetch.rate_limit_backoff_ms, 5000);
        assert_eq!(config.fetch.timeout_backoff_ms, 2000);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_without_cities_fails_validation() {
        let config_content = r#"
[api]
base-url = "https://booking-com15.p.rapidapi.com/api/v1"

[search]
checkin-date = "2025-11-20"
checkout-date = "2025-11-25"

[output]
database-path = "./staylio.db"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
