//! Error types for the caching gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching gateway.
///
/// Strategy-level network failures never surface here; each strategy
/// degrades to a cached entry or a synthetic 503 internally. These variants
/// cover pass-through fetches, store faults, and startup problems.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Upstream fetch failed on a path that bypasses the cache
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    /// Cache store read/write failed
    #[error("Store operation failed: {0}")]
    Store(String),

    /// Malformed inbound request or configuration value
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A precache asset could not be fetched or stored during install
    #[error("Precache failed for {path}: {reason}")]
    Precache { path: String, reason: String },
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CacheError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Precache { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching gateway.
pub type Result<T> = std::result::Result<T, CacheError>;
