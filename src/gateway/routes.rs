//! Gateway Routes
//!
//! Configures the axum router: operational endpoints under `/_cache/` and
//! the catch-all proxy route that owns the interception boundary.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::manager::Fetcher;
use crate::store::ResponseStore;

use super::handlers::{health_handler, proxy_handler, stats_handler, AppState};

/// Creates the gateway router.
///
/// # Endpoints
/// - `GET /_cache/health` - Health check
/// - `GET /_cache/stats` - Cache statistics
/// - everything else - proxied through the cache manager
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router<F: Fetcher, S: ResponseStore>(state: AppState<F, S>) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/_cache/health", get(health_handler))
        .route("/_cache/stats", get(stats_handler::<F, S>))
        .fallback(proxy_handler::<F, S>)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
