//! Ingestion orchestrator - main pipeline control flow
//!
//! This module drives the two-phase ingestion:
//! 1. For each configured city, walk listing pages until the empty-page
//!    streak or short-page heuristic terminates the city, parsing and
//!    persisting hotels not yet in the store.
//! 2. For every hotel stored in this run, fetch and persist its
//!    high-resolution photo URLs.
//!
//! Nothing inside the loops is fatal: bad records, rate limits, and
//! constraint violations are logged and skipped. The only aborting
//! failures happen during construction (database, HTTP client).

use crate::api::{ApiClient, ListingsResult};
use crate::config::{ApiCredentials, CityEntry, Config};
use crate::ingest::parser::parse_hotel;
use crate::output::RunStats;
use crate::storage::{open_storage, SqliteStorage, Storage};
use crate::IngestError;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Consecutive empty or missing-shape pages that terminate a city
const MAX_EMPTY_PAGES: u32 = 3;

/// A page with fewer hotels than this is treated as the city's last page
const FULL_PAGE_SIZE: usize = 20;

/// Main pipeline orchestrator
///
/// Owns every piece of shared state for the run's duration: the stats
/// counters, the queue of hotel ids awaiting image fetches, and the
/// single database handle. Execution is fully sequential.
pub struct Orchestrator {
    cities: Vec<CityEntry>,
    client: ApiClient,
    storage: SqliteStorage,
    pacing: Duration,
    stats: RunStats,
    pending_images: Vec<i64>,
    run_id: i64,
}

impl Orchestrator {
    /// Creates a new orchestrator instance
    ///
    /// Opens the database (creating the schema if needed), records a new
    /// run, and builds the HTTP client. Any failure here aborts the run.
    pub fn new(
        config: &Config,
        credentials: &ApiCredentials,
        config_hash: &str,
    ) -> Result<Self, IngestError> {
        let mut storage = open_storage(Path::new(&config.output.database_path))?;
        let run_id = storage.create_run(config_hash)?;

        let client = ApiClient::new(&config.api, &config.fetch, &config.search, credentials)?;

        Ok(Self {
            cities: config.cities.clone(),
            client,
            storage,
            pacing: Duration::from_millis(config.fetch.pacing_interval_ms),
            stats: RunStats::default(),
            pending_images: Vec::new(),
            run_id,
        })
    }

    /// Runs the full two-phase ingestion and returns the aggregated stats
    pub async fn run(mut self) -> Result<RunStats, IngestError> {
        tracing::info!("Starting ingestion run {}", self.run_id);

        let cities = std::mem::take(&mut self.cities);
        for city in &cities {
            tracing::info!("Processing city: {}", city.name);
            self.process_city(city).await;
            self.stats.cities_processed += 1;
        }

        if !self.pending_images.is_empty() {
            tracing::info!(
                "Fetching high-resolution images for {} hotels",
                self.pending_images.len()
            );
            self.fetch_pending_images().await;
        }

        self.storage.complete_run(self.run_id)?;
        tracing::info!("Ingestion run {} complete", self.run_id);

        Ok(self.stats)
    }

    /// Walks listing pages for one city until a termination condition
    ///
    /// Per page:
    /// - no data / missing shape: empty streak +1, error counter +1
    /// - zero-length hotel list: empty streak +1, processed-pages +1
    /// - one or more hotels: streak reset, processed-pages +1, hotels
    ///   handled; fewer than a full page ends the city immediately
    ///
    /// Three consecutive empty pages end the city without a fourth fetch.
    /// Exactly one pacing delay accompanies every fetch, so request pacing
    /// stays uniform across city boundaries.
    async fn process_city(&mut self, city: &CityEntry) {
        let mut page: u32 = 1;
        let mut consecutive_empty: u32 = 0;
        let mut city_new: u64 = 0;
        let mut last_page = false;

        while !last_page && consecutive_empty < MAX_EMPTY_PAGES {
            match self.client.fetch_listings(&city.dest_id, page).await {
                ListingsResult::NoData => {
                    tracing::warn!("{} page {}: no data", city.name, page);
                    consecutive_empty += 1;
                    self.stats.errors += 1;
                }
                ListingsResult::Page(hotels) if hotels.is_empty() => {
                    tracing::info!("{} page {}: empty", city.name, page);
                    consecutive_empty += 1;
                    self.stats.pages_processed += 1;
                }
                ListingsResult::Page(hotels) => {
                    consecutive_empty = 0;
                    self.stats.pages_processed += 1;

                    let page_size = hotels.len();
                    let (inserted, skipped) = self.process_page(&hotels, city);
                    city_new += inserted;
                    tracing::info!(
                        "{} page {}: +{} new, {} skipped",
                        city.name,
                        page,
                        inserted,
                        skipped
                    );

                    // A short page means the API has run out of results
                    if page_size < FULL_PAGE_SIZE {
                        tracing::info!(
                            "{} page {} is the last page ({} hotels)",
                            city.name,
                            page,
                            page_size
                        );
                        last_page = true;
                    }
                }
            }

            page += 1;
            self.pace().await;
        }

        tracing::info!("City {} complete: {} hotels added", city.name, city_new);
    }

    /// Handles every hotel item on one listings page
    ///
    /// Returns (inserted, skipped) counts for this page. Items without an
    /// id or that fail to parse are dropped without counting; insert
    /// failures are logged and the hotel is simply not counted as stored.
    fn process_page(&mut self, hotels: &[Value], city: &CityEntry) -> (u64, u64) {
        let mut inserted: u64 = 0;
        let mut skipped: u64 = 0;

        for item in hotels {
            let Some(hotel_id) = item.get("hotel_id").and_then(Value::as_i64) else {
                continue;
            };

            match self.storage.hotel_exists(hotel_id) {
                Ok(true) => {
                    self.stats.hotels_skipped += 1;
                    skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Existence check for hotel {} failed: {}", hotel_id, e);
                    continue;
                }
            }

            let Some(record) = parse_hotel(item, &city.name) else {
                tracing::debug!("Dropping unparsable item for hotel {}", hotel_id);
                continue;
            };

            match self.storage.insert_hotel(&record) {
                Ok(()) => {
                    self.stats.hotels_stored += 1;
                    inserted += 1;
                    self.pending_images.push(hotel_id);
                }
                Err(e) => {
                    tracing::warn!("Failed to insert hotel {}: {}", hotel_id, e);
                }
            }
        }

        (inserted, skipped)
    }

    /// Phase two: image fetches for every hotel stored in this run
    ///
    /// Ids are visited in run order. Hotels that already have an image
    /// row are skipped; a pacing delay follows every hotel regardless of
    /// outcome.
    async fn fetch_pending_images(&mut self) {
        let pending = std::mem::take(&mut self.pending_images);
        let total = pending.len();

        for (idx, hotel_id) in pending.into_iter().enumerate() {
            match self.client.fetch_photos(hotel_id).await {
                Some(urls) => match self.storage.image_exists(hotel_id) {
                    Ok(true) => {
                        tracing::debug!(
                            "[{}/{}] Hotel {}: images already present",
                            idx + 1,
                            total,
                            hotel_id
                        );
                    }
                    Ok(false) => match self.storage.insert_images(hotel_id, &urls) {
                        Ok(()) => {
                            self.stats.images_stored += urls.len() as u64;
                            tracing::info!(
                                "[{}/{}] Hotel {}: saved {} images",
                                idx + 1,
                                total,
                                hotel_id,
                                urls.len()
                            );
                        }
                        Err(e) => {
                            tracing::warn!(
                                "[{}/{}] Hotel {}: image insert failed: {}",
                                idx + 1,
                                total,
                                hotel_id,
                                e
                            );
                        }
                    },
                    Err(e) => {
                        tracing::warn!(
                            "[{}/{}] Hotel {}: image existence check failed: {}",
                            idx + 1,
                            total,
                            hotel_id,
                            e
                        );
                    }
                },
                None => {
                    tracing::debug!("[{}/{}] Hotel {}: no images", idx + 1, total, hotel_id);
                }
            }

            self.pace().await;
        }
    }

    async fn pace(&self) {
        tokio::time::sleep(self.pacing).await;
    }
}
