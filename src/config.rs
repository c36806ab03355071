//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which cache backend sits in front of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process TTL cache with LRU eviction
    Memory,
    /// Redis-compatible server
    Redis,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// sqlx connection string for the profile store
    pub database_url: String,
    /// Cache backend selection
    pub cache_backend: CacheBackend,
    /// Redis connection string, used when `cache_backend` is Redis
    pub redis_url: String,
    /// TTL in seconds for cached profiles
    pub cache_ttl: u64,
    /// TTL in seconds for cached listing pages, 0 disables page caching
    pub page_cache_ttl: u64,
    /// Upper bound on a single cache round-trip, in milliseconds
    pub cache_timeout_ms: u64,
    /// Maximum number of entries the in-process cache holds
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Page size used when the caller omits one or sends garbage
    pub default_page_size: u64,
    /// Largest page size a caller may request
    pub max_page_size: u64,
    /// Drop the cached profile after an update or delete
    pub invalidate_on_write: bool,
    /// Number of generated profiles to insert into an empty store at startup
    pub seed_profiles: usize,
    /// Path prefix used when building navigation links
    pub base_path: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` (default: 9090)
    /// - `DATABASE_URL` (default: `sqlite://fitness.db?mode=rwc`)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` (default: `redis://127.0.0.1:6379`)
    /// - `CACHE_TTL` - seconds (default: 3600)
    /// - `PAGE_CACHE_TTL` - seconds (default: 30)
    /// - `CACHE_TIMEOUT_MS` (default: 250)
    /// - `MAX_ENTRIES` (default: 10000)
    /// - `CLEANUP_INTERVAL` - seconds (default: 1)
    /// - `DEFAULT_PAGE_SIZE` (default: 10)
    /// - `MAX_PAGE_SIZE` (default: 100)
    /// - `INVALIDATE_ON_WRITE` (default: true)
    /// - `SEED_PROFILES` (default: 0)
    /// - `BASE_PATH` (default: `/users`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            cache_backend: parsed("CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            cache_ttl: parsed("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            page_cache_ttl: parsed("PAGE_CACHE_TTL").unwrap_or(defaults.page_cache_ttl),
            cache_timeout_ms: parsed("CACHE_TIMEOUT_MS").unwrap_or(defaults.cache_timeout_ms),
            max_entries: parsed("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parsed("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            default_page_size: parsed("DEFAULT_PAGE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.default_page_size),
            max_page_size: parsed("MAX_PAGE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.max_page_size),
            invalidate_on_write: env::var("INVALIDATE_ON_WRITE")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.invalidate_on_write),
            seed_profiles: parsed("SEED_PROFILES").unwrap_or(defaults.seed_profiles),
            base_path: env::var("BASE_PATH")
                .map(|p| p.trim_end_matches('/').to_string())
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.base_path),
        }
    }

    /// Cache round-trip bound as a Duration.
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 9090,
            database_url: "sqlite://fitness.db?mode=rwc".to_string(),
            cache_backend: CacheBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            cache_ttl: 3600,
            page_cache_ttl: 30,
            cache_timeout_ms: 250,
            max_entries: 10_000,
            cleanup_interval: 1,
            default_page_size: 10,
            max_page_size: 100,
            invalidate_on_write: true,
            seed_profiles: 0,
            base_path: "/users".to_string(),
        }
    }
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
