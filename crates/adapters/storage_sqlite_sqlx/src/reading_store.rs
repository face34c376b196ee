//! `SQLite` implementation of the reading store port.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use emuhub_app::ports::ReadingStore;
use emuhub_domain::device::DeviceKind;
use emuhub_domain::error::HubError;
use emuhub_domain::reading::ReadingRecord;
use emuhub_domain::time::Timestamp;

use crate::error::StorageError;

struct Wrapper(ReadingRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device: String = row.try_get("device")?;
        let value: String = row.try_get("value")?;
        let timestamp_str: String = row.try_get("timestamp")?;

        let device = DeviceKind::from_key(&device).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown device key: {device}").into())
        })?;
        let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(ReadingRecord {
            device,
            value,
            timestamp,
        }))
    }
}

const INSERT: &str = "INSERT INTO readings (device, value, timestamp) VALUES (?, ?, ?)";
const SELECT_RECENT: &str =
    "SELECT device, value, timestamp FROM readings ORDER BY timestamp DESC, id DESC LIMIT ?";
const PING: &str = "SELECT 1";

/// `SQLite`-backed reading store.
#[derive(Clone)]
pub struct SqliteReadingStore {
    pool: SqlitePool,
}

impl SqliteReadingStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingStore for SqliteReadingStore {
    async fn insert(
        &self,
        device: DeviceKind,
        value: &str,
        timestamp: Timestamp,
    ) -> Result<(), HubError> {
        sqlx::query(INSERT)
            .bind(device.as_key())
            .bind(value)
            .bind(timestamp.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ReadingRecord>, HubError> {
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn ping(&self) -> bool {
        // The pool reconnects transparently; a failed ping just reports
        // the store as unreachable.
        match sqlx::query(PING).execute(&self.pool).await {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(%error, "reading store ping failed");
                false
            }
        }
    }
}
