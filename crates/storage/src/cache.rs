//! In-memory cache for query results
//!
//! This module provides the LRU-bounded, TTL-aware cache the query layer
//! stores serialized payloads in. Expired entries read as misses.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cache error types
#[derive(Debug, Error)]
pub enum CacheError {
    /// A previous writer panicked while holding the cache lock
    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction
    pub max_entries: usize,
    /// TTL applied when a put does not specify one (None = never expire)
    pub default_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 512,
            default_ttl: Some(Duration::from_secs(3600)), // 1 hour
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the default TTL
    pub fn default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// A cached value plus its expiry deadline
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| Instant::now() > deadline)
    }
}

/// LRU cache with per-entry TTL
///
/// Values are cloned out on read; the query layer stores serialized JSON
/// strings, so clones are cheap. All methods take `&self` and are safe to
/// share behind an `Arc`.
pub struct QueryCache<V> {
    entries: Mutex<LruCache<String, Entry<V>>>,
    config: CacheConfig,
}

impl<V: Clone> QueryCache<V> {
    /// Create a new cache
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries)
            .unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            config,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruCache<String, Entry<V>>>> {
        self.entries.lock().map_err(|_| CacheError::Poisoned)
    }

    /// Get a value, treating expired entries as misses
    pub fn get(&self, key: &str) -> Result<Option<V>> {
        let mut entries = self.lock()?;

        let expired = entries.peek(key).map(Entry::is_expired).unwrap_or(false);
        if expired {
            entries.pop(key);
            return Ok(None);
        }

        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    /// Store a value, falling back to the configured default TTL
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> Result<()> {
        let entry = Entry::new(value, ttl.or(self.config.default_ttl));
        self.lock()?.put(key.into(), entry);
        Ok(())
    }

    /// Remove a value, returning whether it was present
    pub fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.pop(key).is_some())
    }

    /// Check whether a live (non-expired) entry exists
    pub fn contains(&self, key: &str) -> Result<bool> {
        let mut entries = self.lock()?;

        match entries.peek(key) {
            Some(entry) if entry.is_expired() => {
                entries.pop(key);
                Ok(false)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    /// Remove every entry
    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    /// Number of entries, including any not yet evicted as expired
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Drop every expired entry, returning how many were removed
    pub fn evict_expired(&self) -> Result<usize> {
        let mut entries = self.lock()?;

        let dead: Vec<String> = entries
            .iter()
            .filter(|(_, e)| e.is_expired())
            .map(|(k, _)| k.clone())
            .collect();

        for key in &dead {
            entries.pop(key);
        }

        Ok(dead.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let cache: QueryCache<String> = QueryCache::new(CacheConfig::new().max_entries(10));

        cache.put("key1", "value1".to_string(), None).unwrap();

        assert_eq!(cache.get("key1").unwrap(), Some("value1".to_string()));
        assert_eq!(cache.get("missing").unwrap(), None);
    }

    #[test]
    fn test_expired_entry_reads_as_miss() {
        let config = CacheConfig::new().default_ttl(Some(Duration::from_millis(50)));
        let cache: QueryCache<i32> = QueryCache::new(config);

        cache.put("key1", 42, None).unwrap();
        assert_eq!(cache.get("key1").unwrap(), Some(42));

        std::thread::sleep(Duration::from_millis(80));

        assert_eq!(cache.get("key1").unwrap(), None);
        assert!(!cache.contains("key1").unwrap());
    }

    #[test]
    fn test_explicit_ttl_overrides_default() {
        let config = CacheConfig::new().default_ttl(Some(Duration::from_millis(10)));
        let cache: QueryCache<i32> = QueryCache::new(config);

        cache
            .put("key1", 7, Some(Duration::from_secs(60)))
            .unwrap();

        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(cache.get("key1").unwrap(), Some(7));
    }

    #[test]
    fn test_lru_eviction() {
        let cache: QueryCache<i32> = QueryCache::new(CacheConfig::new().max_entries(3));

        cache.put("key1", 1, None).unwrap();
        cache.put("key2", 2, None).unwrap();
        cache.put("key3", 3, None).unwrap();
        cache.put("key4", 4, None).unwrap();

        assert_eq!(cache.len().unwrap(), 3);
        assert_eq!(cache.get("key1").unwrap(), None);
        assert_eq!(cache.get("key4").unwrap(), Some(4));
    }

    #[test]
    fn test_remove() {
        let cache: QueryCache<String> = QueryCache::new(CacheConfig::default());

        cache.put("key1", "value1".to_string(), None).unwrap();
        assert!(cache.remove("key1").unwrap());
        assert!(!cache.remove("key1").unwrap());
        assert_eq!(cache.get("key1").unwrap(), None);
    }

    #[test]
    fn test_clear_and_len() {
        let cache: QueryCache<i32> = QueryCache::new(CacheConfig::default());

        cache.put("key1", 1, None).unwrap();
        cache.put("key2", 2, None).unwrap();
        assert_eq!(cache.len().unwrap(), 2);

        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_evict_expired() {
        let cache: QueryCache<i32> = QueryCache::new(CacheConfig::new().default_ttl(None));

        cache
            .put("short", 1, Some(Duration::from_millis(20)))
            .unwrap();
        cache.put("long", 2, None).unwrap();

        std::thread::sleep(Duration::from_millis(50));

        assert_eq!(cache.evict_expired().unwrap(), 1);
        assert_eq!(cache.len().unwrap(), 1);
        assert_eq!(cache.get("long").unwrap(), Some(2));
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let cache: QueryCache<i32> = QueryCache::new(CacheConfig::new().max_entries(0));

        cache.put("key1", 1, None).unwrap();
        assert_eq!(cache.get("key1").unwrap(), Some(1));
    }
}
