//! Cachefront - an offline-first HTTP caching gateway
//!
//! Fronts an upstream origin with a pattern-matched cache: static assets are
//! served cache-first, app assets stale-while-revalidate, pages
//! network-first, and dynamic API endpoints bypass the cache entirely.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cachefront::store::MemoryStore;
use cachefront::{
    create_router, spawn_cleanup_task, AppState, CacheManager, Config, HttpFetcher,
};

/// Main entry point for the Cachefront gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the HTTP fetcher and in-memory response store
/// 4. Install: precache the configured asset list (best-effort)
/// 5. Activate: purge stale cache generations
/// 6. Start the background expiry sweep task
/// 7. Start the axum gateway on the configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachefront=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cachefront caching gateway");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: upstream={}, port={}, store={}, cleanup_interval={}s",
        config.upstream_origin,
        config.server_port,
        config.store_name(),
        config.cleanup_interval
    );

    let fetcher = match HttpFetcher::new(Duration::from_secs(config.upstream_timeout)) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            error!("Failed to build HTTP client: {err}");
            return;
        }
    };

    let manager = match CacheManager::new(fetcher, MemoryStore::new(), &config) {
        Ok(manager) => manager,
        Err(err) => {
            error!("Failed to initialize cache manager: {err}");
            return;
        }
    };

    // Install: precache core assets. The gateway still serves if the
    // upstream is briefly down; entries fill in on first fetch.
    match manager.install().await {
        Ok(count) => info!("Install complete: precached {count} assets"),
        Err(err) => warn!("Install failed, continuing without precache: {err}"),
    }

    // Activate: purge every store generation except the current one
    match manager.activate() {
        Ok(removed) => info!("Activate complete: removed {removed} stale generations"),
        Err(err) => warn!("Activate failed: {err}"),
    }

    // Start background expiry sweep task
    let cleanup_handle = spawn_cleanup_task(manager.clone(), config.cleanup_interval);
    info!("Background expiry sweep task started");

    // Create router with the proxy fallback and operational endpoints
    let app = create_router(AppState { manager });

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {addr}: {err}");
            return;
        }
    };
    info!("Gateway listening on http://{}", addr);

    // Start server with graceful shutdown
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
    {
        error!("Server error: {err}");
    }

    info!("Gateway shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
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

    // Abort the sweep task
    cleanup_handle.abort();
    warn!("Expiry sweep task aborted");
}
