//! Shared response caches with a get-or-compute contract.
//!
//! A cache maps a string key to a serialised response and a time to live.
//! [`get_or_compute`] layers the memoization policy on top of any
//! [`ResponseCache`]:
//!
//! - a fresh entry is decoded and returned without computing;
//! - a miss, an expired entry, an unreadable store or an undecodable entry
//!   runs the compute future;
//! - only successful computations are written back, so a failure is retried
//!   by the next caller.
//!
//! No single-flight de-duplication happens here. Concurrent misses on the same
//! key each run their compute future and the last write wins.

mod error;
mod memory;
mod migrator;
mod sqlite;

pub use error::CacheError;
pub use memory::MemoryResponseCache;
pub use migrator::{CURRENT_SCHEMA_VERSION, SchemaVersion, migrate_database};
pub use sqlite::{CachedResponse, SqliteResponseCache};

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key/value store holding serialised responses with an expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns the stored value for `key` if it exists and has not expired.
    async fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key` until `ttl` elapses, replacing any entry.
    async fn write(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Removes the entry for `key`, if any.
    async fn invalidate(&self, key: &str) -> Result<(), CacheError>;
}

/// Where a [`get_or_compute`] result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    /// A fresh cache entry.
    Cache,
    /// The compute future.
    Computed,
}

impl LookupSource {
    /// Short label used in logs and telemetry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Computed => "live",
        }
    }
}

/// A value returned by [`get_or_compute`] alongside its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<T> {
    /// The cached or computed value.
    pub value: T,
    /// Whether the value was served from the cache.
    pub source: LookupSource,
}

/// Returns the value cached under `key`, or computes, stores and returns it.
///
/// Cache store failures never fail the lookup: an unreadable store falls
/// through to `compute` and a failed write is logged and dropped.
///
/// # Errors
///
/// Propagates the error of `compute` unchanged. Nothing is written to the
/// cache in that case.
pub async fn get_or_compute<C, T, E, F, Fut>(
    cache: &C,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<Lookup<T>, E>
where
    C: ResponseCache + ?Sized,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(value) = read_fresh(cache, key).await {
        tracing::debug!("response cache hit for {key}");
        return Ok(Lookup {
            value,
            source: LookupSource::Cache,
        });
    }

    tracing::debug!("response cache miss for {key}");
    let value = compute().await?;

    match serde_json::to_string(&value) {
        Ok(serialised) => {
            if let Err(error) = cache.write(key, &serialised, ttl).await {
                tracing::warn!("failed to store response for {key}: {error}");
            }
        }
        Err(error) => tracing::warn!("failed to serialise response for {key}: {error}"),
    }

    Ok(Lookup {
        value,
        source: LookupSource::Computed,
    })
}

async fn read_fresh<C, T>(cache: &C, key: &str) -> Option<T>
where
    C: ResponseCache + ?Sized,
    T: DeserializeOwned,
{
    let stored = match cache.read(key).await {
        Ok(stored) => stored?,
        Err(error) => {
            tracing::warn!("response cache read failed for {key}, fetching live: {error}");
            return None;
        }
    };

    match serde_json::from_str(&stored) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!("discarding undecodable cache entry for {key}: {error}");
            None
        }
    }
}
