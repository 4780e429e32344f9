//! Fetcher Module
//!
//! The network primitive behind the cache manager: a trait so the gateway
//! runs against reqwest while tests script their own upstream, plus the
//! request/response types crossing that seam.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use url::Url;

use crate::error::{CacheError, Result};
use crate::store::{cache_key, CachedResponse};

// == Fetch Request ==
/// An intercepted request on its way to the upstream origin.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// HTTP method, uppercase
    pub method: String,
    /// Absolute upstream URL
    pub url: Url,
    /// Forwarded request headers
    pub headers: Vec<(String, String)>,
    /// Request body, if any (pass-through requests only)
    pub body: Option<Bytes>,
}

impl FetchRequest {
    /// A bare GET request, as issued during precache.
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Store key for this request: normalized method plus URL.
    pub fn cache_key(&self) -> String {
        cache_key(&self.method, self.url.as_str())
    }
}

// == Fetched Response ==
/// The upstream's answer, with the final URL after redirects.
///
/// The final URL matters to the safety gate: a response whose redirect
/// chain left the configured origin is never cached.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub response: CachedResponse,
    pub final_url: Url,
}

// == Fetcher Trait ==
/// Issues one network fetch. No retries, no cancellation; a timeout, if
/// any, belongs to the implementation.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, req: &FetchRequest) -> impl Future<Output = Result<FetchedResponse>> + Send;
}

// Hop-by-hop headers describe one connection, not the resource. They are
// neither forwarded upstream nor captured into the store.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "transfer-encoding",
    "content-length",
    "keep-alive",
    "upgrade",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
];

pub(crate) fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| name.eq_ignore_ascii_case(h))
}

// == HTTP Fetcher ==
/// reqwest-backed fetcher used by the gateway binary.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Upstream(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, req: &FetchRequest) -> impl Future<Output = Result<FetchedResponse>> + Send {
        let client = self.client.clone();
        let req = req.clone();
        async move {
            let method = reqwest::Method::from_bytes(req.method.as_bytes())
                .map_err(|e| CacheError::InvalidRequest(format!("bad method {}: {e}", req.method)))?;

            let mut builder = client.request(method, req.url.clone());
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = req.body {
                builder = builder.body(body);
            }

            let resp = builder
                .send()
                .await
                .map_err(|e| CacheError::Upstream(e.to_string()))?;

            let final_url = resp.url().clone();
            let status = resp.status().as_u16();
            let headers = resp
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    if is_hop_by_hop(name.as_str()) {
                        return None;
                    }
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = resp
                .bytes()
                .await
                .map_err(|e| CacheError::Upstream(e.to_string()))?;

            Ok(FetchedResponse {
                response: CachedResponse::new(status, headers, body),
                final_url,
            })
        }
    }
}
