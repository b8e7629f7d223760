//! SQLite storage implementation

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{HotelRecord, RunRecord, RunStatus};
use crate::IngestError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
///
/// Holds one long-lived connection, opened at startup and closed when the
/// value is dropped at process end. Each insert commits individually, so
/// a crash mid-run leaves a valid, resumable state.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a database at the given path
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(IngestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, IngestError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, IngestError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, run_id],
        )?;
        Ok(())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                        .unwrap_or(RunStatus::Running),
                })
            })
            .optional()?;

        Ok(run)
    }

    // ===== Hotels =====

    fn hotel_exists(&self, hotel_id: i64) -> StorageResult<bool> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM hotels WHERE id = ?1",
                params![hotel_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(existing.is_some())
    }

    fn insert_hotel(&mut self, hotel: &HotelRecord) -> StorageResult<()> {
        let result = self.conn.execute(
            "INSERT INTO hotels (
                id, city, name, description, address, latitude, longitude,
                review_score, review_score_word, review_count, ranking_position,
                property_class, accurate_property_class, ufi, country_code,
                is_preferred, is_travel_sustainable, price_value, currency,
                main_photo_url, all_photo_urls
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21
            )",
            params![
                hotel.id,
                hotel.city,
                hotel.name,
                hotel.description,
                hotel.address,
                hotel.latitude,
                hotel.longitude,
                hotel.review_score,
                hotel.review_score_word,
                hotel.review_count,
                hotel.ranking_position,
                hotel.property_class,
                hotel.accurate_property_class,
                hotel.ufi,
                hotel.country_code,
                hotel.is_preferred,
                hotel.is_travel_sustainable,
                hotel.price_value,
                hotel.currency,
                hotel.main_photo_url,
                hotel.all_photo_urls,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, msg))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::ConstraintViolation(format!(
                    "hotel {}: {}",
                    hotel.id,
                    msg.unwrap_or_default()
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ===== Images =====

    fn image_exists(&self, hotel_id: i64) -> StorageResult<bool> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT hotel_id FROM hotel_images WHERE hotel_id = ?1",
                params![hotel_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(existing.is_some())
    }

    fn insert_images(&mut self, hotel_id: i64, urls: &[String]) -> StorageResult<()> {
        if urls.is_empty() {
            return Err(StorageError::EmptyInsert(format!(
                "no photo URLs for hotel {}",
                hotel_id
            )));
        }

        self.conn.execute(
            "INSERT INTO hotel_images (hotel_id, photo_urls) VALUES (?1, ?2)",
            params![hotel_id, urls.join(",")],
        )?;

        Ok(())
    }

    // ===== Statistics =====

    fn count_hotels(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM hotels", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_hotels_by_city(&self) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT city, COUNT(*) as count FROM hotels GROUP BY city ORDER BY count DESC",
        )?;

        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    fn count_image_rows(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM hotel_images", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hotel(id: i64, city: &str) -> HotelRecord {
        HotelRecord {
            id,
            city: city.to_string(),
            name: Some("Test Hotel".to_string()),
            description: Some("A hotel".to_string()),
            address: None,
            latitude: Some(18.52),
            longitude: Some(73.85),
            review_score: Some(8.4),
            review_score_word: Some("Very Good".to_string()),
            review_count: Some(1200),
            ranking_position: Some(3),
            property_class: Some(4),
            accurate_property_class: Some(4),
            ufi: "-2108361".to_string(),
            country_code: Some("in".to_string()),
            is_preferred: true,
            is_travel_sustainable: false,
            price_value: Some(4500.0),
            currency: Some("INR".to_string()),
            main_photo_url: Some("https://img.example.com/1.jpg".to_string()),
            all_photo_urls: Some(
                "https://img.example.com/1.jpg,https://img.example.com/2.jpg".to_string(),
            ),
        }
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_create_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("test_hash").unwrap();
        assert!(run_id > 0);
    }

    #[test]
    fn test_complete_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("test_hash").unwrap();
        storage.complete_run(run_id).unwrap();

        let run = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(run.id, run_id);
        assert_eq!(run.status, RunStatus::Completed);
        assert!(run.finished_at.is_some());
    }

    #[test]
    fn test_insert_and_exists() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        assert!(!storage.hotel_exists(100).unwrap());
        storage.insert_hotel(&sample_hotel(100, "pune")).unwrap();
        assert!(storage.hotel_exists(100).unwrap());
    }

    #[test]
    fn test_duplicate_insert_is_constraint_violation() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.insert_hotel(&sample_hotel(100, "pune")).unwrap();

        let result = storage.insert_hotel(&sample_hotel(100, "pune"));
        assert!(matches!(
            result,
            Err(StorageError::ConstraintViolation(_))
        ));
        assert_eq!(storage.count_hotels().unwrap(), 1);
    }

    #[test]
    fn test_insert_hotel_with_unset_price() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let mut hotel = sample_hotel(101, "mumbai");
        hotel.price_value = None;
        hotel.currency = None;

        storage.insert_hotel(&hotel).unwrap();
        assert!(storage.hotel_exists(101).unwrap());
    }

    #[test]
    fn test_insert_images_and_exists() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.insert_hotel(&sample_hotel(100, "pune")).unwrap();

        assert!(!storage.image_exists(100).unwrap());
        storage
            .insert_images(
                100,
                &[
                    "https://img.example.com/hd1.jpg".to_string(),
                    "https://img.example.com/hd2.jpg".to_string(),
                ],
            )
            .unwrap();
        assert!(storage.image_exists(100).unwrap());
        assert_eq!(storage.count_image_rows().unwrap(), 1);
    }

    #[test]
    fn test_insert_images_empty_list_rejected() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.insert_hotel(&sample_hotel(100, "pune")).unwrap();

        let result = storage.insert_images(100, &[]);
        assert!(matches!(result, Err(StorageError::EmptyInsert(_))));
        assert_eq!(storage.count_image_rows().unwrap(), 0);
    }

    #[test]
    fn test_count_hotels_by_city() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.insert_hotel(&sample_hotel(1, "pune")).unwrap();
        storage.insert_hotel(&sample_hotel(2, "pune")).unwrap();
        storage.insert_hotel(&sample_hotel(3, "mumbai")).unwrap();

        let counts = storage.count_hotels_by_city().unwrap();
        assert_eq!(counts[0], ("pune".to_string(), 2));
        assert_eq!(counts[1], ("mumbai".to_string(), 1));
    }
}
