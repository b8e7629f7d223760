//! Storage module for persisting hotel data
//!
//! This module handles all database operations for the pipeline, including:
//! - SQLite database initialization and schema management
//! - Hotel and image row inserts with existence checks
//! - Run tracking
//! - Statistics queries for reporting

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::IngestError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// This is the one failure in the pipeline that aborts the whole run.
pub fn open_storage(path: &Path) -> Result<SqliteStorage, IngestError> {
    SqliteStorage::new(path)
}

/// A hotel row, normalized from one raw API listing item
///
/// Created once and never updated; duplicate ids are skipped at ingestion
/// time. `address` is always absent because the search endpoint does not
/// carry it. `price_value` and `currency` come from the same nested
/// gross-price object, so they are both present or both absent.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelRecord {
    pub id: i64,
    pub city: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub review_score: Option<f64>,
    pub review_score_word: Option<String>,
    pub review_count: Option<i64>,
    pub ranking_position: Option<i64>,
    pub property_class: Option<i64>,
    pub accurate_property_class: Option<i64>,
    pub ufi: String,
    pub country_code: Option<String>,
    pub is_preferred: bool,
    pub is_travel_sustainable: bool,
    pub price_value: Option<f64>,
    pub currency: Option<String>,
    pub main_photo_url: Option<String>,
    pub all_photo_urls: Option<String>,
}

/// Represents an ingestion run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of an ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_roundtrip() {
        for status in &[RunStatus::Running, RunStatus::Completed] {
            let db_str = status.to_db_string();
            let parsed = RunStatus::from_db_string(db_str);
            assert_eq!(Some(*status), parsed);
        }
    }

    #[test]
    fn test_run_status_invalid() {
        assert_eq!(RunStatus::from_db_string("invalid"), None);
    }
}
