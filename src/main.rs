//! Shortlink - a URL shortener service core
//!
//! A bounded, least-used-evicting lookup cache in front of a durable
//! SQLite store of record, exposed through a small REST API.

mod alias;
mod api;
mod cache;
mod config;
mod deadline;
mod error;
mod models;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::{LinkCache, MemoryCache, NoopCache, RedisCache};
use config::{CacheBackendKind, Config};
use storage::{LinkService, SqliteStore};

/// Main entry point for the shortlink server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Construct the configured cache backend
/// 4. Open the SQLite store of record
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shortlink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlink Server");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_backend={:?}, cache_capacity={}, db_path={}, op_timeout={}ms, port={}",
        config.cache_backend, config.cache_capacity, config.db_path, config.op_timeout_ms,
        config.server_port
    );

    // Construct the configured cache backend
    let link_cache: Box<dyn LinkCache> = match config.cache_backend {
        CacheBackendKind::Memory => Box::new(MemoryCache::new(config.cache_capacity)),
        CacheBackendKind::Redis => Box::new(
            RedisCache::connect(&config.redis_url, config.cache_capacity)
                .await
                .context("failed to connect to redis cache")?,
        ),
        CacheBackendKind::Off => Box::new(NoopCache::new()),
    };

    // Open the durable store of record
    let store = SqliteStore::open(&config.db_path).context("failed to open sqlite store")?;

    let service = Arc::new(LinkService::new(Box::new(store), link_cache));
    let state = AppState::new(Arc::clone(&service), config.op_timeout());
    info!("Link service initialized");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind server port")?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Release cache and store resources
    if let Err(err) = service.close().await {
        warn!("Shutdown cleanup failed: {}", err);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
}
