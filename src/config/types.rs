use serde::Deserialize;

/// Main configuration structure for Staylio-Ingest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    #[serde(rename = "city", default)]
    pub cities: Vec<CityEntry>,
}

/// Remote API endpoint configuration
///
/// The two authentication header values are deliberately absent here:
/// they are read from the process environment, never from the file.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Root of the search API, e.g. "https://booking-com15.p.rapidapi.com/api/v1"
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Fixed search parameters sent with every listings request
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Arrival date in ISO format (YYYY-MM-DD)
    #[serde(rename = "checkin-date")]
    pub checkin_date: String,

    /// Departure date in ISO format (YYYY-MM-DD)
    #[serde(rename = "checkout-date")]
    pub checkout_date: String,

    /// Number of adults per room
    #[serde(default = "default_adults")]
    pub adults: u32,

    /// Comma-separated children ages
    #[serde(rename = "children-ages", default = "default_children_ages")]
    pub children_ages: String,

    /// Number of rooms
    #[serde(rename = "room-quantity", default = "default_room_quantity")]
    pub room_quantity: u32,

    /// Currency code for returned prices
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Language code for returned text
    #[serde(default = "default_language")]
    pub language: String,
}

/// Pacing, retry, and timeout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Delay between consecutive API requests (milliseconds)
    #[serde(rename = "pacing-interval-ms", default = "default_pacing_interval_ms")]
    pub pacing_interval_ms: u64,

    /// Maximum attempts per request before giving up
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Base wait after an HTTP 429; actual wait is base x attempt number
    #[serde(rename = "rate-limit-backoff-ms", default = "default_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,

    /// Fixed wait after a request timeout before retrying
    #[serde(rename = "timeout-backoff-ms", default = "default_timeout_backoff_ms")]
    pub timeout_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            pacing_interval_ms: default_pacing_interval_ms(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            rate_limit_backoff_ms: default_rate_limit_backoff_ms(),
            timeout_backoff_ms: default_timeout_backoff_ms(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// A city to ingest, identified by the API's destination id
#[derive(Debug, Clone, Deserialize)]
pub struct CityEntry {
    /// City name as stored on each hotel row (e.g. "pune")
    pub name: String,

    /// Destination identifier used by the search endpoint
    #[serde(rename = "dest-id")]
    pub dest_id: String,
}

/// API authentication headers, sourced from the process environment
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    /// Value for the x-rapidapi-host header
    pub host: String,

    /// Value for the x-rapidapi-key header
    pub key: String,
}

fn default_adults() -> u32 {
    2
}

fn default_children_ages() -> String {
    "0,17".to_string()
}

fn default_room_quantity() -> u32 {
    1
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_language() -> String {
    "en-us".to_string()
}

fn default_pacing_interval_ms() -> u64 {
    3000
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_backoff_ms() -> u64 {
    5000
}

fn default_timeout_backoff_ms() -> u64 {
    2000
}
