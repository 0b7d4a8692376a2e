//! Error types for response cache stores.

use thiserror::Error;

/// Errors returned by response cache implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The database URL/path was present but blank.
    #[error("database URL must not be blank")]
    BlankDatabaseUrl,

    /// Establishing a `SQLite` connection failed.
    #[error("failed to connect to SQLite database: {message}")]
    ConnectionFailed {
        /// Error detail from Diesel.
        message: String,
    },

    /// Running pending migrations failed.
    #[error("failed to run database migrations: {message}")]
    MigrationFailed {
        /// Error detail from Diesel migrations.
        message: String,
    },

    /// Reading the schema version from the migration table failed.
    #[error("failed to read schema version after migrations: {message}")]
    SchemaVersionQueryFailed {
        /// Error detail from Diesel query execution.
        message: String,
    },

    /// The migrations completed but no schema version could be found.
    #[error("no schema version recorded after migrations ran")]
    MissingSchemaVersion,

    /// The cache table does not exist yet.
    #[error("response cache schema is not initialised (run with --migrate-db)")]
    SchemaNotInitialised,

    /// Reading an entry failed.
    #[error("failed to read response cache: {message}")]
    QueryFailed {
        /// Error detail from the store.
        message: String,
    },

    /// Writing or deleting an entry failed.
    #[error("failed to write response cache: {message}")]
    WriteFailed {
        /// Error detail from the store.
        message: String,
    },

    /// The in-memory store lock was poisoned by a panicking writer.
    #[error("in-memory response cache lock is poisoned")]
    Poisoned,
}
