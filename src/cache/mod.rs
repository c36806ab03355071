//! Cache Module
//!
//! The `Cache` contract and its two backends: an in-process TTL cache with
//! LRU eviction, and Redis.

pub mod codec;
mod entry;
mod lru;
mod memory;
mod redis;
mod stats;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

// Re-export public types
pub use self::redis::RedisCache;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use memory::{MemoryCache, MemoryStore};
pub use stats::{ratio, CacheStats};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Cache Trait ==
/// Byte-oriented key/value cache with expiry.
///
/// `get` returns `Ok(None)` for an absent or expired key. `Err` always means
/// the backend could not answer and says nothing about the data.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;

    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Backend-side counters, when the backend keeps any.
    async fn backend_stats(&self) -> Option<CacheStats> {
        None
    }
}
