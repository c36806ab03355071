//! Redis cache backend
//!
//! Speaks plain `GET` / `SET .. EX` / `DEL` through a `ConnectionManager`,
//! which reconnects on its own. Every round-trip is bounded by `op_timeout`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::info;

use crate::cache::Cache;
use crate::error::{CacheError, CacheResult};

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connects to `url` and verifies the server answers within `op_timeout`.
    pub async fn connect(url: &str, op_timeout: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = bounded(op_timeout, ConnectionManager::new(client)).await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { conn, op_timeout })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("GET").arg(key).to_owned();
        // A nil reply decodes to None: that is the miss signal.
        bounded(self.op_timeout, cmd.query_async(&mut conn)).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(expiry_seconds(ttl))
            .to_owned();
        bounded(self.op_timeout, cmd.query_async(&mut conn)).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("DEL").arg(key).to_owned();
        let _removed: i64 = bounded(self.op_timeout, cmd.query_async(&mut conn)).await?;
        Ok(())
    }
}

/// `SET EX` takes whole seconds and rejects 0, so round up to at least 1.
fn expiry_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

async fn bounded<T, F>(limit: Duration, fut: F) -> CacheResult<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(CacheError::from),
        Err(_) => Err(CacheError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_seconds_rounds_up() {
        assert_eq!(expiry_seconds(Duration::from_secs(3600)), 3600);
        assert_eq!(expiry_seconds(Duration::from_millis(1500)), 2);
        assert_eq!(expiry_seconds(Duration::from_millis(10)), 1);
        assert_eq!(expiry_seconds(Duration::ZERO), 1);
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, redis::RedisError>(())
        };

        let result = bounded(Duration::from_millis(10), slow).await;
        assert!(matches!(result, Err(CacheError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_server_is_an_error() {
        // Port 1 on loopback refuses connections.
        let result = RedisCache::connect("redis://127.0.0.1:1", Duration::from_millis(200)).await;
        assert!(matches!(
            result,
            Err(CacheError::Backend(_)) | Err(CacheError::Timeout(_))
        ));
    }
}
