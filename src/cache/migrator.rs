//! Schema setup for the `SQLite` response cache.
//!
//! [`migrate_database`] is the only way the `response_cache` table comes into
//! existence. Callers either run it once up front (`--migrate-db`) or open the
//! cache with [`SqliteResponseCache::open_migrated`], which runs it on every
//! open.

use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::{CacheError, SqliteResponseCache};

/// Response cache migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Version of the newest response cache migration.
pub const CURRENT_SCHEMA_VERSION: &str = "20261001000000";

/// The response cache schema version a database is at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    /// Returns the inner version string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the database is at the newest migration this build knows.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.0 == CURRENT_SCHEMA_VERSION
    }
}

/// Brings the response cache schema at `database_url` up to date.
///
/// Applying migrations to an already current database is a no-op. After the
/// migrations run the `response_cache` table must exist; the resulting schema
/// version is recorded in telemetry.
///
/// # Errors
///
/// Returns [`CacheError::BlankDatabaseUrl`] for a blank URL,
/// [`CacheError::SchemaNotInitialised`] when the cache table is still missing
/// afterwards, or another [`CacheError`] when the database cannot be opened or
/// migrated.
pub fn migrate_database(
    database_url: &str,
    telemetry: &dyn TelemetrySink,
) -> Result<SchemaVersion, CacheError> {
    let trimmed = database_url.trim();
    if trimmed.is_empty() {
        return Err(CacheError::BlankDatabaseUrl);
    }

    let mut connection =
        SqliteConnection::establish(trimmed).map_err(|error| CacheError::ConnectionFailed {
            message: error.to_string(),
        })?;

    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|error| CacheError::MigrationFailed {
            message: error.to_string(),
        })?;
    tracing::debug!("applied {} response cache migration(s) to {trimmed}", applied.len());

    ensure_cache_table(&mut connection)?;
    let schema_version = applied_schema_version(&mut connection)?;
    if !schema_version.is_current() {
        tracing::warn!(
            "response cache schema {} differs from {CURRENT_SCHEMA_VERSION}",
            schema_version.as_str()
        );
    }

    telemetry.record(TelemetryEvent::SchemaVersionRecorded {
        schema_version: schema_version.as_str().to_owned(),
    });
    Ok(schema_version)
}

fn ensure_cache_table(connection: &mut SqliteConnection) -> Result<(), CacheError> {
    match SqliteResponseCache::cache_table_exists(connection) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CacheError::SchemaNotInitialised),
        Err(error) => Err(CacheError::SchemaVersionQueryFailed {
            message: error.to_string(),
        }),
    }
}

fn applied_schema_version(
    connection: &mut SqliteConnection,
) -> Result<SchemaVersion, CacheError> {
    let versions = connection
        .applied_migrations()
        .map_err(|error| CacheError::SchemaVersionQueryFailed {
            message: error.to_string(),
        })?;

    versions
        .into_iter()
        .max()
        .map(|version| SchemaVersion(version.to_string()))
        .ok_or(CacheError::MissingSchemaVersion)
}

impl SqliteResponseCache {
    /// Migrates the database at `database_url` and opens a cache on it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the URL is blank or the schema cannot be
    /// brought up to date.
    pub fn open_migrated(
        database_url: impl Into<String>,
        telemetry: &dyn TelemetrySink,
    ) -> Result<Self, CacheError> {
        let cache = Self::new(database_url)?;
        migrate_database(cache.database_url(), telemetry)?;
        Ok(cache)
    }
}
