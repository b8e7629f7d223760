//! Storage traits and error types

use crate::storage::{HotelRecord, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Nothing to insert: {0}")]
    EmptyInsert(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The store is append-only: there are no update or delete operations.
/// Re-running ingestion never changes an existing row, it only adds rows
/// for ids not yet seen.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new ingestion run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as completed with a finish timestamp
    fn complete_run(&mut self, run_id: i64) -> StorageResult<()>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Hotels =====

    /// Point lookup by primary key
    fn hotel_exists(&self, hotel_id: i64) -> StorageResult<bool>;

    /// Inserts one hotel row
    ///
    /// A duplicate id surfaces as a constraint violation; the caller is
    /// expected to log and continue.
    fn insert_hotel(&mut self, hotel: &HotelRecord) -> StorageResult<()>;

    // ===== Images =====

    /// Checks whether an image row exists for the given hotel
    fn image_exists(&self, hotel_id: i64) -> StorageResult<bool>;

    /// Inserts one image row holding the comma-joined URL list
    ///
    /// An empty URL list is rejected; nothing is inserted.
    fn insert_images(&mut self, hotel_id: i64, urls: &[String]) -> StorageResult<()>;

    // ===== Statistics =====

    /// Total hotel rows in the store
    fn count_hotels(&self) -> StorageResult<u64>;

    /// Hotel counts grouped by city, largest first
    fn count_hotels_by_city(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Total image rows in the store
    fn count_image_rows(&self) -> StorageResult<u64>;
}
