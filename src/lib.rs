//! Fitness Cache - read-through caching for a profile store
//!
//! A SQLite-backed profile store fronted by a TTL cache (in-process or
//! Redis), served over a paginated REST API with navigation links.

pub mod api;
pub mod cache;
pub mod cached_store;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod records;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cached_store::{CacheOptions, CachedRecordStore};
pub use config::{CacheBackend, Config};
pub use error::{CacheError, Error, Result};
pub use records::{RecordStore, SqliteRecordStore};
pub use tasks::spawn_cleanup_task;
