//! Database schema definitions
//!
//! All SQL schema for the hotel store. Creation is idempotent and runs
//! before any insert.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track ingestion runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Hotel listings, keyed by the externally-assigned hotel id
CREATE TABLE IF NOT EXISTS hotels (
    id INTEGER PRIMARY KEY,
    city TEXT,
    name TEXT,
    description TEXT,
    address TEXT,
    latitude REAL,
    longitude REAL,
    review_score REAL,
    review_score_word TEXT,
    review_count INTEGER,
    ranking_position INTEGER,
    property_class INTEGER,
    accurate_property_class INTEGER,
    ufi TEXT,
    country_code TEXT,
    is_preferred INTEGER,
    is_travel_sustainable INTEGER,
    price_value REAL,
    currency TEXT,
    main_photo_url TEXT,
    all_photo_urls TEXT
);

CREATE INDEX IF NOT EXISTS idx_hotels_city ON hotels(city);
CREATE INDEX IF NOT EXISTS idx_hotels_review_score ON hotels(review_score);
CREATE INDEX IF NOT EXISTS idx_hotels_price ON hotels(price_value);
CREATE INDEX IF NOT EXISTS idx_hotels_property_class ON hotels(property_class);

-- High-resolution photo URLs, one row per hotel
CREATE TABLE IF NOT EXISTS hotel_images (
    hotel_id INTEGER NOT NULL REFERENCES hotels(id),
    photo_urls TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_hotel_images_hotel ON hotel_images(hotel_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
