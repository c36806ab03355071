//! Read-path counters for the cached store.
//!
//! Atomics rather than a lock: the cached store itself holds no lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::cache::ratio;

#[derive(Debug, Default)]
pub struct ReadStats {
    hits: AtomicU64,
    misses: AtomicU64,
    cache_errors: AtomicU64,
    store_reads: AtomicU64,
    invalidations: AtomicU64,
}

impl ReadStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A cache call failed or returned undecodable bytes.
    pub fn record_cache_error(&self) {
        self.cache_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_read(&self) {
        self.store_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ReadStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        ReadStatsSnapshot {
            hits,
            misses,
            cache_errors: self.cache_errors.load(Ordering::Relaxed),
            store_reads: self.store_reads.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            hit_rate: ratio(hits, hits + misses),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub cache_errors: u64,
    pub store_reads: u64,
    pub invalidations: u64,
    pub hit_rate: f64,
}
