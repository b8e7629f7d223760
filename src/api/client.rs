//! API client implementation
//!
//! This module handles all HTTP requests against the travel-search API:
//! - Building a reqwest client with the authentication headers
//! - Paginated listing searches per destination
//! - Per-hotel photo lookups
//! - Bounded retry with backoff for timeouts and rate limits
//!
//! Failures are downgraded to empty results rather than propagated; a
//! multi-hour run must survive rate-limit noise and flaky responses.

use crate::config::{ApiConfig, ApiCredentials, FetchConfig, SearchConfig};
use crate::{ConfigError, IngestError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Measurement units requested from the API
const UNITS: &str = "metric";

/// Temperature unit requested from the API
const TEMPERATURE_UNIT: &str = "c";

/// Outcome of a paginated listings request
#[derive(Debug)]
pub enum ListingsResult {
    /// The `data.hotels` list from the response; may be empty
    Page(Vec<Value>),

    /// Transport failure, HTTP error, retry exhaustion, or a response
    /// body missing the expected `data.hotels` shape
    NoData,
}

/// Client for the listings and photos endpoints
pub struct ApiClient {
    client: Client,
    base_url: String,
    search: SearchConfig,
    max_retries: u32,
    rate_limit_backoff: Duration,
    timeout_backoff: Duration,
}

impl ApiClient {
    /// Builds an API client with authentication headers installed
    ///
    /// # Arguments
    ///
    /// * `api` - Endpoint configuration
    /// * `fetch` - Retry/timeout configuration
    /// * `search` - Fixed search parameters sent with every listings request
    /// * `credentials` - Header values read from the environment
    pub fn new(
        api: &ApiConfig,
        fetch: &FetchConfig,
        search: &SearchConfig,
        credentials: &ApiCredentials,
    ) -> Result<Self, IngestError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-rapidapi-host", header_value(&credentials.host)?);
        headers.insert("x-rapidapi-key", header_value(&credentials.key)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(fetch.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            search: search.clone(),
            max_retries: fetch.max_retries,
            rate_limit_backoff: Duration::from_millis(fetch.rate_limit_backoff_ms),
            timeout_backoff: Duration::from_millis(fetch.timeout_backoff_ms),
        })
    }

    /// Fetches one page of hotel listings for a destination
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 429 | Retry, wait = rate-limit backoff x attempt number |
    /// | Timeout | Retry, fixed timeout backoff |
    /// | Other HTTP error | Immediate NoData |
    /// | Other transport error | Immediate NoData |
    /// | Retries exhausted | NoData |
    ///
    /// A 2xx response whose body lacks the `data.hotels` list also yields
    /// NoData; the caller cannot distinguish that from a failed request,
    /// and does not need to.
    pub async fn fetch_listings(&self, dest_id: &str, page: u32) -> ListingsResult {
        let url = format!("{}/hotels/searchHotels", self.base_url);
        let page_number = page.to_string();
        let adults = self.search.adults.to_string();
        let room_qty = self.search.room_quantity.to_string();

        let params: Vec<(&str, &str)> = vec![
            ("dest_id", dest_id),
            ("search_type", "CITY"),
            ("arrival_date", &self.search.checkin_date),
            ("departure_date", &self.search.checkout_date),
            ("adults", &adults),
            ("children_age", &self.search.children_ages),
            ("room_qty", &room_qty),
            ("page_number", &page_number),
            ("units", UNITS),
            ("temperature_unit", TEMPERATURE_UNIT),
            ("languagecode", &self.search.language),
            ("currency_code", &self.search.currency),
        ];

        let body = match self.get_with_retry(&url, &params).await {
            Some(body) => body,
            None => return ListingsResult::NoData,
        };

        match body
            .get("data")
            .and_then(|d| d.get("hotels"))
            .and_then(Value::as_array)
        {
            Some(hotels) => ListingsResult::Page(hotels.clone()),
            None => {
                tracing::debug!("Listings response for dest {} missing data.hotels", dest_id);
                ListingsResult::NoData
            }
        }
    }

    /// Fetches high-resolution photo URLs for one hotel
    ///
    /// Entries without a `url` field are dropped. Returns `None` when the
    /// request fails, the `data` list is missing, or nothing survives
    /// filtering; the same retry policy as listings applies.
    pub async fn fetch_photos(&self, hotel_id: i64) -> Option<Vec<String>> {
        let url = format!("{}/hotels/getHotelPhotos", self.base_url);
        let id = hotel_id.to_string();
        let params: Vec<(&str, &str)> = vec![("hotel_id", &id)];

        let body = self.get_with_retry(&url, &params).await?;

        let photos = body.get("data").and_then(Value::as_array)?;
        let urls: Vec<String> = photos
            .iter()
            .filter_map(|photo| photo.get("url").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        if urls.is_empty() {
            None
        } else {
            Some(urls)
        }
    }

    /// Issues a GET with the shared retry/backoff policy
    ///
    /// Returns the decoded JSON body, or `None` once the request is given
    /// up on. Only the retry loop's own counter survives between attempts.
    async fn get_with_retry(&self, url: &str, params: &[(&str, &str)]) -> Option<Value> {
        for attempt in 1..=self.max_retries {
            let response = match self.client.get(url).query(params).send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    if attempt < self.max_retries {
                        tracing::warn!(
                            "Timeout for {}, retrying (attempt {}/{})",
                            url,
                            attempt + 1,
                            self.max_retries
                        );
                        tokio::time::sleep(self.timeout_backoff).await;
                        continue;
                    }
                    tracing::warn!("Timeout for {} after {} attempts", url, self.max_retries);
                    return None;
                }
                Err(e) => {
                    tracing::warn!("Request to {} failed: {}", url, e);
                    return None;
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt < self.max_retries {
                    let wait = self.rate_limit_backoff * attempt;
                    tracing::warn!("Rate limited on {}, waiting {:?}", url, wait);
                    tokio::time::sleep(wait).await;
                    continue;
                }
                tracing::warn!("Rate limit exceeded for {}", url);
                return None;
            }

            if !status.is_success() {
                tracing::warn!("HTTP {} from {}", status, url);
                return None;
            }

            return match response.json::<Value>().await {
                Ok(body) => Some(body),
                Err(e) => {
                    tracing::warn!("Failed to decode response from {}: {}", url, e);
                    None
                }
            };
        }

        None
    }
}

fn header_value(value: &str) -> Result<HeaderValue, IngestError> {
    HeaderValue::from_str(value).map_err(|_| {
        IngestError::Config(ConfigError::Validation(
            "API credential contains invalid header characters".to_string(),
        ))
    })
}
