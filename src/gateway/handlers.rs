//! Gateway Handlers
//!
//! The axum side of the gateway: the fallback handler that turns every
//! inbound request into a cache manager fetch, and the operational
//! endpoints under `/_cache/`.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{CacheError, Result};
use crate::manager::{is_hop_by_hop, CacheManager, FetchRequest, Fetcher};
use crate::store::{CachedResponse, ResponseStore};

use super::responses::{HealthResponse, StatsResponse};

// == App State ==
/// Shared application state: one cache manager, cloned per request.
pub struct AppState<F, S> {
    pub manager: CacheManager<F, S>,
}

impl<F, S> Clone for AppState<F, S> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
        }
    }
}

// == Proxy Handler ==
/// Fallback handler for every proxied path.
///
/// Maps the inbound request onto the upstream origin (method, path, query,
/// headers, body) and hands it to the manager; the manager decides whether
/// the store is involved.
pub async fn proxy_handler<F: Fetcher, S: ResponseStore>(
    State(state): State<AppState<F, S>>,
    req: Request,
) -> Result<Response> {
    let (parts, body) = req.into_parts();

    // The inbound request contributes only a path and query. The authority
    // always comes from the configured upstream, so a protocol-relative
    // target like `//other.host/x` cannot steer the proxy off-origin.
    let mut url = state.manager.base_url().clone();
    url.set_path(parts.uri.path());
    url.set_query(parts.uri.query());

    // Host belongs to the upstream; hop-by-hop headers belong to this
    // connection. Everything else is forwarded as-is.
    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            if name.as_str().eq_ignore_ascii_case("host") || is_hop_by_hop(name.as_str()) {
                return None;
            }
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| CacheError::InvalidRequest(e.to_string()))?;

    let fetch_req = FetchRequest {
        method: parts.method.as_str().to_string(),
        url,
        headers,
        body: if body.is_empty() { None } else { Some(body) },
    };

    let response = state.manager.handle_fetch(fetch_req).await?;
    Ok(response.into_response())
}

// == Response Conversion ==
impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut builder = Response::builder().status(status);
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                builder = builder.header(name, value);
            }
        }
        builder
            .body(Body::from(self.body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

// == Operational Endpoints ==
/// Handler for GET /_cache/stats
pub async fn stats_handler<F: Fetcher, S: ResponseStore>(
    State(state): State<AppState<F, S>>,
) -> Json<StatsResponse> {
    let stats = state.manager.stats();
    Json(StatsResponse::new(&stats, state.manager.entry_count()))
}

/// Handler for GET /_cache/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
