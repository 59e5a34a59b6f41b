//! Response cache
//!
//! Key/value cache with per-entry TTL. Entries are never invalidated
//! explicitly; they simply stop being returned once they expire.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use sports_core::SportsError;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Cache backend used by the service layer
#[async_trait]
pub trait Cache: Send + Sync {
    /// Look up a live entry
    async fn get(&self, key: &str) -> Result<Option<Value>, SportsError>;

    /// Store an entry that expires after `ttl`
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), SportsError>;
}

/// Cached value with its expiry
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local cache
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        let removed = before - entries.len();

        if removed > 0 {
            debug!("Purged {} expired cache entries", removed);
        }

        removed
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();
        let fresh = entries.values().filter(|e| e.is_fresh(now)).count();

        CacheStats {
            total: entries.len(),
            fresh,
            expired: entries.len() - fresh,
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, SportsError> {
        let now = Instant::now();

        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.is_fresh(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: remove it unless a writer refreshed it in the meantime
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| !e.is_fresh(now)) {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), SportsError> {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub fresh: usize,
    pub expired: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("series:4").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = InMemoryCache::new();
        cache.set("series:4", json!([{ "a": 1 }]), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("series:4").await.unwrap(), Some(json!([{ "a": 1 }])));
    }

    #[tokio::test]
    async fn test_empty_list_is_a_hit() {
        let cache = InMemoryCache::new();
        cache.set("markets:4:1", json!([]), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("markets:4:1").await.unwrap(), Some(json!([])));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = InMemoryCache::new();
        cache.set("k", json!(1), Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some(json!(1)));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_and_stats() {
        let cache = InMemoryCache::new();
        cache.set("short", json!(1), Duration::from_secs(5)).await.unwrap();
        cache.set("long", json!(2), Duration::from_secs(500)).await.unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(
            cache.stats(),
            CacheStats {
                total: 2,
                fresh: 1,
                expired: 1
            }
        );

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }
}
