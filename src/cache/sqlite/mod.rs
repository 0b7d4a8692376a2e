//! Response cache backed by `SQLite`.
//!
//! Entries survive process restarts and are shared by every process pointing
//! at the same database file, which makes this the store of choice when
//! several workers fetch on behalf of the same users. The schema is created by
//! [`migrate_database`](super::migrate_database).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use diesel::Connection;
use diesel::OptionalExtension;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::SqliteConnection;

use super::{CacheError, ResponseCache};

const RESPONSE_CACHE_TABLE: &str = "response_cache";

/// A stored response together with its freshness window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// Serialised response body.
    pub payload: String,
    /// Unix timestamp when the entry was written.
    pub fetched_at_unix: i64,
    /// Unix timestamp from which the entry is stale.
    pub expires_at_unix: i64,
}

impl CachedResponse {
    /// Returns true if the entry is expired at the supplied `now_unix`.
    #[must_use]
    pub const fn is_expired(&self, now_unix: i64) -> bool {
        now_unix >= self.expires_at_unix
    }
}

/// SQLite-backed response cache.
#[derive(Debug, Clone)]
pub struct SqliteResponseCache {
    database_url: String,
}

impl SqliteResponseCache {
    /// Create a cache targeting the configured `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::BlankDatabaseUrl`] when the URL is blank.
    pub fn new(database_url: impl Into<String>) -> Result<Self, CacheError> {
        let database_url_string = database_url.into();
        if database_url_string.trim().is_empty() {
            return Err(CacheError::BlankDatabaseUrl);
        }
        Ok(Self {
            database_url: database_url_string,
        })
    }

    pub(super) fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Fetches the entry stored under `key`, fresh or not.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the database cannot be opened, the cache
    /// schema is missing, or the query fails.
    pub fn get(&self, key: &str) -> Result<Option<CachedResponse>, CacheError> {
        #[derive(Debug, QueryableByName)]
        struct Row {
            #[diesel(sql_type = Text)]
            payload: String,
            #[diesel(sql_type = BigInt)]
            fetched_at_unix: i64,
            #[diesel(sql_type = BigInt)]
            expires_at_unix: i64,
        }

        let mut connection = self.establish_connection()?;

        let result: Option<Row> = sql_query(
            "SELECT payload, fetched_at_unix, expires_at_unix \
             FROM response_cache \
             WHERE cache_key = ? \
             LIMIT 1;",
        )
        .bind::<Text, _>(key)
        .get_result(&mut connection)
        .optional()
        .map_err(|error| Self::map_query_error(&mut connection, &error))?;

        Ok(result.map(|row| CachedResponse {
            payload: row.payload,
            fetched_at_unix: row.fetched_at_unix,
            expires_at_unix: row.expires_at_unix,
        }))
    }

    /// Inserts or replaces the entry stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the schema is missing or the write fails.
    pub fn upsert(&self, key: &str, entry: &CachedResponse) -> Result<(), CacheError> {
        let mut connection = self.establish_connection()?;

        sql_query(
            "INSERT INTO response_cache \
             (cache_key, payload, fetched_at_unix, expires_at_unix) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(cache_key) DO UPDATE SET \
               payload = excluded.payload, \
               fetched_at_unix = excluded.fetched_at_unix, \
               expires_at_unix = excluded.expires_at_unix, \
               updated_at = CURRENT_TIMESTAMP;",
        )
        .bind::<Text, _>(key)
        .bind::<Text, _>(entry.payload.as_str())
        .bind::<BigInt, _>(entry.fetched_at_unix)
        .bind::<BigInt, _>(entry.expires_at_unix)
        .execute(&mut connection)
        .map(drop)
        .map_err(|error| Self::map_write_error(&mut connection, &error))
    }

    /// Deletes the entry stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the schema is missing or the delete fails.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut connection = self.establish_connection()?;

        sql_query("DELETE FROM response_cache WHERE cache_key = ?;")
            .bind::<Text, _>(key)
            .execute(&mut connection)
            .map(drop)
            .map_err(|error| Self::map_write_error(&mut connection, &error))
    }

    /// Deletes every entry that is stale at `now_unix` and returns how many
    /// rows were removed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the schema is missing or the delete fails.
    pub fn purge_expired(&self, now_unix: i64) -> Result<usize, CacheError> {
        let mut connection = self.establish_connection()?;

        sql_query("DELETE FROM response_cache WHERE expires_at_unix <= ?;")
            .bind::<BigInt, _>(now_unix)
            .execute(&mut connection)
            .map_err(|error| Self::map_write_error(&mut connection, &error))
    }

    /// Returns the current unix timestamp in seconds.
    #[must_use]
    pub fn now_unix_seconds() -> i64 {
        // A clock set before the epoch yields 0; seconds beyond `i64` saturate.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map_or_else(
                || 0,
                |duration| i64::try_from(duration.as_secs()).unwrap_or(i64::MAX),
            )
    }

    fn expiry_window(now_unix: i64, ttl: Duration) -> (i64, i64) {
        // Partial seconds round up so a sub-second TTL is not stale on write.
        let whole_seconds = ttl
            .as_secs()
            .saturating_add(u64::from(ttl.subsec_nanos() > 0));
        let ttl_unix = i64::try_from(whole_seconds).unwrap_or(i64::MAX);
        (now_unix, now_unix.saturating_add(ttl_unix))
    }

    fn establish_connection(&self) -> Result<SqliteConnection, CacheError> {
        SqliteConnection::establish(&self.database_url).map_err(|error| {
            CacheError::ConnectionFailed {
                message: error.to_string(),
            }
        })
    }

    pub(super) fn cache_table_exists(
        connection: &mut SqliteConnection,
    ) -> Result<bool, diesel::result::Error> {
        #[derive(Debug, QueryableByName)]
        struct Row {
            #[diesel(sql_type = BigInt)]
            count: i64,
        }

        let row: Row = sql_query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?;",
        )
        .bind::<Text, _>(RESPONSE_CACHE_TABLE)
        .get_result(connection)?;

        Ok(row.count > 0)
    }

    fn map_error_with_schema_check<F>(
        connection: &mut SqliteConnection,
        error: &diesel::result::Error,
        create_error: F,
    ) -> CacheError
    where
        F: Fn(String) -> CacheError,
    {
        match Self::cache_table_exists(connection) {
            Ok(false) => CacheError::SchemaNotInitialised,
            Ok(true) => create_error(error.to_string()),
            Err(check_error) => create_error(format!(
                "schema presence check failed: {check_error}; original error: {error}"
            )),
        }
    }

    fn map_query_error(
        connection: &mut SqliteConnection,
        error: &diesel::result::Error,
    ) -> CacheError {
        Self::map_error_with_schema_check(connection, error, |message| CacheError::QueryFailed {
            message,
        })
    }

    fn map_write_error(
        connection: &mut SqliteConnection,
        error: &diesel::result::Error,
    ) -> CacheError {
        Self::map_error_with_schema_check(connection, error, |message| CacheError::WriteFailed {
            message,
        })
    }
}

#[async_trait]
impl ResponseCache for SqliteResponseCache {
    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Self::now_unix_seconds();
        Ok(self
            .get(key)?
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.payload))
    }

    async fn write(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let (fetched_at_unix, expires_at_unix) =
            Self::expiry_window(Self::now_unix_seconds(), ttl);
        self.upsert(
            key,
            &CachedResponse {
                payload: value.to_owned(),
                fetched_at_unix,
                expires_at_unix,
            },
        )
    }

    async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.delete(key)
    }
}
