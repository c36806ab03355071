//! Fitness Cache - profile API server
//!
//! Startup: logging, config, profile store (seeded when asked and empty),
//! cache backend, HTTP server with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitness_cache::cache::{Cache, MemoryCache, RedisCache};
use fitness_cache::records::seed_profiles;
use fitness_cache::{
    create_router, spawn_cleanup_task, AppState, CacheBackend, CacheOptions, CachedRecordStore,
    Config, RecordStore, SqliteRecordStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitness_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Fitness Cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, ttl={}s, page_ttl={}s, port={}, base_path={}",
        config.cache_backend,
        config.cache_ttl,
        config.page_cache_ttl,
        config.server_port,
        config.base_path
    );

    let store = SqliteRecordStore::connect(&config.database_url, 5)
        .await
        .with_context(|| format!("opening profile store at {}", config.database_url))?;

    if config.seed_profiles > 0 && store.count().await? == 0 {
        seed_profiles(&store, config.seed_profiles).await?;
    }

    let (cache, cleanup_handle) = build_cache(&config).await?;

    let profiles = CachedRecordStore::new(
        Arc::new(store),
        cache,
        CacheOptions::from_config(&config),
    );
    let app = create_router(AppState::new(profiles));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Picks the cache backend. Only the in-process one needs a sweeper task.
async fn build_cache(config: &Config) -> anyhow::Result<(Arc<dyn Cache>, Option<JoinHandle<()>>)> {
    match config.cache_backend {
        CacheBackend::Memory => {
            let cache = MemoryCache::new(config.max_entries);
            let handle = spawn_cleanup_task(cache.shared(), config.cleanup_interval);
            info!("In-process cache ready (max_entries={})", config.max_entries);
            Ok((Arc::new(cache), Some(handle)))
        }
        CacheBackend::Redis => {
            let cache = RedisCache::connect(&config.redis_url, config.cache_timeout())
                .await
                .with_context(|| format!("connecting to redis at {}", config.redis_url))?;
            Ok((Arc::new(cache), None))
        }
    }
}

/// Waits for Ctrl+C or SIGTERM, then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
