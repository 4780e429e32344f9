//! Gateway Module
//!
//! HTTP shell around the cache manager. Owns the network-interception
//! boundary: every inbound request lands in the proxy fallback handler.
//!
//! # Endpoints
//! - `GET /_cache/health` - Health check
//! - `GET /_cache/stats` - Cache statistics
//! - everything else - proxied through the cache manager

pub mod handlers;
pub mod responses;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
