//! Read-through caching in front of a `RecordStore`.
//!
//! `CachedRecordStore` wraps a durable store and a cache. The store stays
//! authoritative: a cache that errors, times out or hands back corrupt bytes
//! only costs latency, never a failed read. Store failures and `NotFound`
//! pass through unchanged, and negative results are never cached.

mod stats;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::cache::{codec, Cache, CacheStats};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Profile, ProfileDraft, ProfilePage};
use crate::pagination::{build_links, total_pages, PageRequest};
use crate::records::RecordStore;

pub use stats::{ReadStats, ReadStatsSnapshot};

// == Options ==
/// Tuning for the cached store.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Lifetime of a cached profile
    pub ttl: Duration,
    /// Lifetime of a cached listing page; zero turns page caching off
    pub page_ttl: Duration,
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Drop `profile:{id}` after a successful update or delete
    pub invalidate_on_write: bool,
    /// Root of the generated navigation links
    pub base_path: String,
}

impl CacheOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ttl: Duration::from_secs(config.cache_ttl),
            page_ttl: Duration::from_secs(config.page_cache_ttl),
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
            invalidate_on_write: config.invalidate_on_write,
            base_path: config.base_path.clone(),
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Cache key for a single profile.
pub fn profile_key(id: i64) -> String {
    format!("profile:{}", id)
}

/// Cache key for one listing window.
pub fn page_key(offset: i64, limit: i64) -> String {
    format!("profiles:{}:{}", offset, limit)
}

/// What a listing window looks like in the cache.
#[derive(Serialize, Deserialize)]
struct CachedPage {
    records: Vec<Profile>,
    total_count: i64,
}

// == Cached Record Store ==
pub struct CachedRecordStore {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn Cache>,
    options: CacheOptions,
    stats: ReadStats,
}

impl CachedRecordStore {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<dyn Cache>, options: CacheOptions) -> Self {
        Self {
            store,
            cache,
            options,
            stats: ReadStats::new(),
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn base_path(&self) -> &str {
        &self.options.base_path
    }

    pub fn read_stats(&self) -> ReadStatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn backend_stats(&self) -> Option<CacheStats> {
        self.cache.backend_stats().await
    }

    // == List Paginated ==
    /// One page of profiles with navigation links.
    ///
    /// Missing, zero or negative `page` / `page_size` are replaced by 1 and
    /// the configured default size.
    pub async fn list_paginated(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<ProfilePage> {
        let request = PageRequest::normalize(
            page,
            page_size,
            self.options.default_page_size,
            self.options.max_page_size,
        );
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let limit = i64::try_from(request.page_size).unwrap_or(i64::MAX);

        let (records, total) = self.list(offset, limit).await?;
        let total_count = u64::try_from(total).unwrap_or(0);
        let base = self.base_path();
        let collection = base.trim_end_matches('/');

        Ok(ProfilePage {
            records: records.into_iter().map(|p| p.with_links(base)).collect(),
            total_count,
            total_pages: total_pages(total_count, request.page_size),
            current_page: request.page,
            page_size: request.page_size,
            links: build_links(collection, request.page, request.page_size, total_count),
        })
    }

    /// Looks `key` up in the cache. Every failure is logged and reads as a miss.
    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key, "cache miss");
                self.stats.record_miss();
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed, falling back to store");
                self.stats.record_cache_error();
                self.stats.record_miss();
                return None;
            }
        };

        match codec::decode(&bytes) {
            Ok(value) => {
                debug!(key, "cache hit");
                self.stats.record_hit();
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "discarding undecodable cache entry");
                self.stats.record_cache_error();
                self.stats.record_miss();
                None
            }
        }
    }

    /// Best-effort populate; the caller already has its answer.
    async fn write_cached<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let bytes = match codec::encode(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "could not encode value for cache");
                self.stats.record_cache_error();
                return;
            }
        };

        if let Err(e) = self.cache.set(key, bytes, ttl).await {
            warn!(key, error = %e, "cache write failed");
            self.stats.record_cache_error();
        }
    }

    async fn invalidate(&self, key: &str) {
        if !self.options.invalidate_on_write {
            return;
        }
        match self.cache.delete(key).await {
            Ok(()) => {
                debug!(key, "cache entry invalidated");
                self.stats.record_invalidation();
            }
            Err(e) => {
                // The entry ages out with its TTL.
                warn!(key, error = %e, "cache invalidation failed");
                self.stats.record_cache_error();
            }
        }
    }

    fn log_store_error(&self, operation: &str, id: Option<i64>, err: &Error) {
        match err {
            Error::NotFound(_) => debug!(operation, ?id, "profile not found"),
            other => error!(operation, ?id, error = %other, "store operation failed"),
        }
    }
}

#[async_trait]
impl RecordStore for CachedRecordStore {
    async fn create(&self, draft: &ProfileDraft) -> Result<i64> {
        self.store.create(draft).await.map_err(|e| {
            self.log_store_error("create", None, &e);
            e
        })
    }

    // == Get By Id ==
    async fn get_by_id(&self, id: i64) -> Result<Profile> {
        let key = profile_key(id);

        if let Some(profile) = self.read_cached::<Profile>(&key).await {
            return Ok(profile);
        }

        let profile = self.store.get_by_id(id).await.map_err(|e| {
            self.log_store_error("get_by_id", Some(id), &e);
            e
        })?;
        self.stats.record_store_read();

        self.write_cached(&key, &profile, self.options.ttl).await;
        Ok(profile)
    }

    async fn update(&self, id: i64, draft: &ProfileDraft) -> Result<()> {
        self.store.update(id, draft).await.map_err(|e| {
            self.log_store_error("update", Some(id), &e);
            e
        })?;
        self.invalidate(&profile_key(id)).await;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete(id).await.map_err(|e| {
            self.log_store_error("delete", Some(id), &e);
            e
        })?;
        self.invalidate(&profile_key(id)).await;
        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Profile>, i64)> {
        let page_ttl = self.options.page_ttl;
        let key = page_key(offset, limit);

        if !page_ttl.is_zero() {
            if let Some(cached) = self.read_cached::<CachedPage>(&key).await {
                return Ok((cached.records, cached.total_count));
            }
        }

        let (records, total_count) = self.store.list(offset, limit).await.map_err(|e| {
            self.log_store_error("list", None, &e);
            e
        })?;
        self.stats.record_store_read();

        if !page_ttl.is_zero() {
            let page = CachedPage {
                records,
                total_count,
            };
            self.write_cached(&key, &page, page_ttl).await;
            return Ok((page.records, page.total_count));
        }

        Ok((records, total_count))
    }

    async fn count(&self) -> Result<i64> {
        self.store.count().await
    }
}
