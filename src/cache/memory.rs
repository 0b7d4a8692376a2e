//! In-process response cache.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{CacheError, ResponseCache};

#[derive(Debug, Clone)]
struct MemoryEntry {
    payload: String,
    // `None` when `now + ttl` overflows `Instant`.
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Response cache held in process memory.
///
/// Entries are shared between every service holding a reference to the same
/// cache and are lost when the process exits. Expired entries are evicted
/// lazily on read.
#[derive(Debug, Default)]
pub struct MemoryResponseCache {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryResponseCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when a writer panicked while holding
    /// the lock.
    pub fn len(&self) -> Result<usize, CacheError> {
        Ok(self.lock()?.len())
    }

    /// Returns true when no entries are stored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when a writer panicked while holding
    /// the lock.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, MemoryEntry>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::Poisoned)
    }
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.lock()?;
        let now = Instant::now();

        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|entry| entry.payload.clone()))
    }

    async fn write(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            payload: value.to_owned(),
            expires_at: Instant::now().checked_add(ttl),
        };
        self.lock()?.insert(key.to_owned(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{MemoryResponseCache, ResponseCache};

    const KEY: &str = "user/1/github_pull_request_service/response";

    #[tokio::test]
    async fn returns_fresh_entries() {
        let cache = MemoryResponseCache::new();
        cache
            .write(KEY, "{}", Duration::from_secs(60))
            .await
            .expect("write should succeed");

        let stored = cache.read(KEY).await.expect("read should succeed");
        assert_eq!(stored.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn evicts_expired_entries_on_read() {
        let cache = MemoryResponseCache::new();
        cache
            .write(KEY, "{}", Duration::ZERO)
            .await
            .expect("write should succeed");

        let stored = cache.read(KEY).await.expect("read should succeed");
        assert_eq!(stored, None, "zero TTL entries are immediately stale");
        assert!(
            cache.is_empty().expect("lock should be available"),
            "expired entry should be evicted"
        );
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let cache = MemoryResponseCache::new();
        cache
            .write(KEY, "{}", Duration::from_secs(60))
            .await
            .expect("write should succeed");
        cache
            .invalidate(KEY)
            .await
            .expect("invalidate should succeed");

        assert_eq!(cache.read(KEY).await.expect("read should succeed"), None);
    }

    #[tokio::test]
    async fn keys_do_not_collide() {
        let cache = MemoryResponseCache::new();
        cache
            .write("user/1/x", "one", Duration::from_secs(60))
            .await
            .expect("write should succeed");
        cache
            .write("user/11/x", "eleven", Duration::from_secs(60))
            .await
            .expect("write should succeed");

        assert_eq!(
            cache
                .read("user/1/x")
                .await
                .expect("read should succeed")
                .as_deref(),
            Some("one")
        );
        assert_eq!(cache.len().expect("lock should be available"), 2);
    }
}
