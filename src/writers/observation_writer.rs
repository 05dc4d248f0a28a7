use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::error::Result;
use crate::models::{Location, ObservationRecord};
use crate::utils::grid::GridPoint;

/// Persists merged observation records and owns the locations catalog
/// tables. The pool is acquired once per batch run; each write is its own
/// transaction.
pub struct ObservationWriter {
    pool: SqlitePool,
}

impl ObservationWriter {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                location_id INTEGER PRIMARY KEY AUTOINCREMENT,
                latitude    REAL NOT NULL,
                longitude   REAL NOT NULL,
                grid_name   TEXT,
                UNIQUE (latitude, longitude)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS observations (
                observation_id INTEGER PRIMARY KEY AUTOINCREMENT,
                location_id    INTEGER NOT NULL REFERENCES locations (location_id),
                timestamp      TEXT NOT NULL,
                o3             REAL,
                no2            REAL,
                hcho           REAL,
                so2            REAL,
                co             REAL,
                aerosol_index  REAL,
                UNIQUE (location_id, timestamp)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Idempotent full-row upsert keyed by (location_id, timestamp).
    ///
    /// A conflicting row has every gas column replaced with the new
    /// record's values, including nulls: each batch run is a complete
    /// best-effort snapshot for its window, so values from an earlier run
    /// must not survive a rerun.
    pub async fn write(&self, record: &ObservationRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO observations
                (location_id, timestamp, o3, no2, hcho, so2, co, aerosol_index)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (location_id, timestamp) DO UPDATE SET
                o3 = excluded.o3,
                no2 = excluded.no2,
                hcho = excluded.hcho,
                so2 = excluded.so2,
                co = excluded.co,
                aerosol_index = excluded.aerosol_index
            "#,
        )
        .bind(record.location_id)
        .bind(record.timestamp)
        .bind(record.o3)
        .bind(record.no2)
        .bind(record.hcho)
        .bind(record.so2)
        .bind(record.co)
        .bind(record.aerosol_index)
        .execute(&self.pool)
        .await?;

        debug!(
            location_id = record.location_id,
            timestamp = %record.timestamp,
            "observation persisted"
        );
        Ok(())
    }

    pub async fn fetch(
        &self,
        location_id: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<ObservationRecord>> {
        let record = sqlx::query_as::<_, ObservationRecord>(
            r#"
            SELECT location_id, timestamp, o3, no2, hcho, so2, co, aerosol_index
            FROM observations
            WHERE location_id = ?1 AND timestamp = ?2
            "#,
        )
        .bind(location_id)
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Insert-or-ignore grid seeding; returns the number of new rows.
    pub async fn seed_locations(&self, points: &[GridPoint]) -> Result<u64> {
        let mut inserted = 0;
        for (latitude, longitude, grid_name) in points {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO locations (latitude, longitude, grid_name)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(*latitude)
            .bind(*longitude)
            .bind(grid_name.as_str())
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    pub async fn load_locations(&self, limit: Option<i64>) -> Result<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            r#"
            SELECT location_id, latitude, longitude, grid_name
            FROM locations
            ORDER BY location_id
            LIMIT ?1
            "#,
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;
        Ok(locations)
    }

    pub async fn location(&self, location_id: i64) -> Result<Option<Location>> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            SELECT location_id, latitude, longitude, grid_name
            FROM locations
            WHERE location_id = ?1
            "#,
        )
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(location)
    }

    pub async fn location_count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
