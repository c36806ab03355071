//! In-process cache backend
//!
//! `MemoryStore` is the synchronous engine (HashMap storage, LRU order, TTL
//! expiry). `MemoryCache` shares it behind an async lock and implements the
//! `Cache` contract.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{Cache, CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, CacheResult};

// == Memory Store ==
/// Capacity-bounded key/value storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct MemoryStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl MemoryStore {
    /// Creates a store holding at most `max_entries` entries (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Set ==
    /// Stores a copy of `value` under `key`, replacing any previous entry.
    ///
    /// At capacity, the least recently used entry is evicted first.
    pub fn set(&mut self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::KeyTooLong(MAX_KEY_LENGTH));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge(MAX_VALUE_SIZE));
        }

        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        self.lru.touch(key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Returns a copy of the live value, or None for absent and expired keys.
    ///
    /// Expired entries are dropped on the way out.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes an entry. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }
}

// == Memory Cache ==
/// Shareable async handle over a `MemoryStore`.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    inner: Arc<RwLock<MemoryStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStore::new(max_entries))),
        }
    }

    /// The shared store, for the background cleanup task.
    pub fn shared(&self) -> Arc<RwLock<MemoryStore>> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        // Write lock: a read updates LRU order and counters.
        Ok(self.inner.write().await.get(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        self.inner.write().await.set(key, value, ttl)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.inner.write().await.delete(key);
        Ok(())
    }

    async fn backend_stats(&self) -> Option<CacheStats> {
        Some(self.inner.read().await.stats())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_store_new() {
        let store = MemoryStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = MemoryStore::new(100);

        store.set("profile:1", b"{}".to_vec(), TTL).unwrap();

        assert_eq!(store.get("profile:1"), Some(b"{}".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent_is_a_miss() {
        let mut store = MemoryStore::new(100);

        assert!(store.get("profile:404").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_delete() {
        let mut store = MemoryStore::new(100);

        store.set("k", b"v".to_vec(), TTL).unwrap();
        assert!(store.delete("k"));
        assert!(!store.delete("k"));
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = MemoryStore::new(100);

        store.set("k", b"one".to_vec(), TTL).unwrap();
        store.set("k", b"two".to_vec(), TTL).unwrap();

        assert_eq!(store.get("k"), Some(b"two".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_returned_value_is_a_copy() {
        let mut store = MemoryStore::new(100);
        store.set("k", b"abc".to_vec(), TTL).unwrap();

        let mut first = store.get("k").unwrap();
        first[0] = b'z';

        assert_eq!(store.get("k"), Some(b"abc".to_vec()));
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = MemoryStore::new(100);

        store.set("k", b"v".to_vec(), Duration::from_millis(50)).unwrap();
        assert!(store.get("k").is_some());

        sleep(Duration::from_millis(80));

        assert!(store.get("k").is_none());
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = MemoryStore::new(3);

        store.set("key1", b"1".to_vec(), TTL).unwrap();
        store.set("key2", b"2".to_vec(), TTL).unwrap();
        store.set("key3", b"3".to_vec(), TTL).unwrap();
        store.get("key1");
        store.set("key4", b"4".to_vec(), TTL).unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.get("key2").is_none());
        assert!(store.get("key1").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = MemoryStore::new(100);

        store.set("short", b"v".to_vec(), Duration::from_millis(50)).unwrap();
        store.set("long", b"v".to_vec(), TTL).unwrap();
        sleep(Duration::from_millis(80));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }

    #[test]
    fn test_store_key_too_long() {
        let mut store = MemoryStore::new(100);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        let result = store.set(&long_key, b"v".to_vec(), TTL);
        assert!(matches!(result, Err(CacheError::KeyTooLong(_))));
    }

    #[test]
    fn test_store_value_too_large() {
        let mut store = MemoryStore::new(100);

        let result = store.set("k", vec![0u8; MAX_VALUE_SIZE + 1], TTL);
        assert!(matches!(result, Err(CacheError::ValueTooLarge(_))));
    }

    #[tokio::test]
    async fn test_memory_cache_contract() {
        let cache = MemoryCache::new(10);

        assert!(cache.get("profile:1").await.unwrap().is_none());
        cache.set("profile:1", b"data".to_vec(), TTL).await.unwrap();
        assert_eq!(cache.get("profile:1").await.unwrap(), Some(b"data".to_vec()));
        cache.delete("profile:1").await.unwrap();
        cache.delete("profile:1").await.unwrap();
        assert!(cache.get("profile:1").await.unwrap().is_none());

        let stats = cache.backend_stats().await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }
}
