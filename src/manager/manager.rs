//! Cache Manager Module
//!
//! The decision core of the gateway. Owns the pattern table, the response
//! and metadata stores, and the fetcher, and exposes the three lifecycle
//! operations the hosting shell drives: `install` (precache), `activate`
//! (generation purge), and `handle_fetch` (per-request strategy dispatch).
//!
//! Nothing in the strategy layer is fatal: network failures fall back to a
//! cached entry or a synthetic 503, store failures count as misses, and
//! responses that fail the safety gate are served without being persisted.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use url::{Origin, Url};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::policy::{ttl_for, PatternTable, Strategy};
use crate::store::{key_url, CacheStats, CachedResponse, EntryMeta, ResponseStore};

use super::fetcher::{FetchRequest, FetchedResponse, Fetcher};

// == Cache Manager ==
/// Strategy dispatcher over one store generation.
///
/// Cheap to clone; all state is behind `Arc`, so clones share the stores,
/// the stats, and the fetcher.
pub struct CacheManager<F, S> {
    fetcher: Arc<F>,
    store: Arc<S>,
    patterns: Arc<PatternTable>,
    stats: Arc<Mutex<CacheStats>>,
    base: Url,
    origin: Origin,
    store_name: String,
    meta_name: String,
    precache_paths: Arc<Vec<String>>,
}

impl<F, S> Clone for CacheManager<F, S> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            store: Arc::clone(&self.store),
            patterns: Arc::clone(&self.patterns),
            stats: Arc::clone(&self.stats),
            base: self.base.clone(),
            origin: self.origin.clone(),
            store_name: self.store_name.clone(),
            meta_name: self.meta_name.clone(),
            precache_paths: Arc::clone(&self.precache_paths),
        }
    }
}

impl<F: Fetcher, S: ResponseStore> CacheManager<F, S> {
    // == Constructor ==
    pub fn new(fetcher: F, store: S, config: &Config) -> Result<Self> {
        let base = Url::parse(&config.upstream_origin).map_err(|e| {
            CacheError::InvalidRequest(format!(
                "invalid upstream origin '{}': {e}",
                config.upstream_origin
            ))
        })?;
        let origin = base.origin();
        Ok(Self {
            fetcher: Arc::new(fetcher),
            store: Arc::new(store),
            patterns: Arc::new(PatternTable::new()),
            stats: Arc::new(Mutex::new(CacheStats::new())),
            base,
            origin,
            store_name: config.store_name(),
            meta_name: config.meta_store_name(),
            precache_paths: Arc::new(config.precache_paths.clone()),
        })
    }

    // == Accessors ==
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn meta_store_name(&self) -> &str {
        &self.meta_name
    }

    /// Snapshot of the strategy counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Entries currently held in the main store.
    pub fn entry_count(&self) -> usize {
        self.store.entry_count(&self.store_name).unwrap_or(0)
    }

    // == Install ==
    /// Fetches every precache path and stores it under the current
    /// generation. Fails on the first path that cannot be fetched or is not
    /// cacheable; entries stored before the failure remain.
    pub async fn install(&self) -> Result<usize> {
        let mut stored = 0;
        for path in self.precache_paths.iter() {
            let url = self.base.join(path).map_err(|e| CacheError::Precache {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            let req = FetchRequest::get(url);
            let fetched = self
                .fetcher
                .fetch(&req)
                .await
                .map_err(|err| CacheError::Precache {
                    path: path.clone(),
                    reason: err.to_string(),
                })?;
            if !self.is_safe_to_cache(&req, &fetched) {
                return Err(CacheError::Precache {
                    path: path.clone(),
                    reason: format!("response not cacheable (status {})", fetched.response.status),
                });
            }
            self.persist(&req.cache_key(), &fetched.response)?;
            stored += 1;
        }
        info!(count = stored, store = %self.store_name, "precache complete");
        Ok(stored)
    }

    // == Activate ==
    /// Deletes every store generation other than the current main store and
    /// the metadata store. Returns how many were removed.
    pub fn activate(&self) -> Result<usize> {
        let mut removed = 0;
        for name in self.store.store_names()? {
            if name != self.store_name && name != self.meta_name {
                if self.store.delete_store(&name)? {
                    info!(store = %name, "deleted stale cache generation");
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    // == Fetch ==
    /// Routes one intercepted request through its strategy.
    ///
    /// Non-GET requests, cross-origin requests, and network-only URLs pass
    /// straight through to the fetcher; their failures surface as
    /// [`CacheError::Upstream`]. Every cached strategy resolves to a
    /// response, degraded if necessary.
    pub async fn handle_fetch(&self, req: FetchRequest) -> Result<CachedResponse> {
        if !req.is_get() {
            return self.pass_through(&req).await;
        }
        if req.url.origin() != self.origin {
            return self.pass_through(&req).await;
        }
        match self.patterns.classify(&Self::request_target(&req.url)) {
            Strategy::NetworkOnly => self.pass_through(&req).await,
            Strategy::CacheFirst => Ok(self.cache_first(&req).await),
            Strategy::StaleWhileRevalidate => Ok(self.stale_while_revalidate(&req).await),
            Strategy::NetworkFirst => Ok(self.network_first(&req).await),
        }
    }

    /// Path-and-query form of a URL. Pattern rules see only this, so the
    /// upstream authority never influences classification or TTL class.
    fn request_target(url: &Url) -> String {
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }

    async fn pass_through(&self, req: &FetchRequest) -> Result<CachedResponse> {
        let fetched = self.fetcher.fetch(req).await?;
        Ok(fetched.response)
    }

    // == Strategies ==
    /// Serve from store unless missing or expired; on network failure the
    /// expired entry is still served rather than failing the request.
    async fn cache_first(&self, req: &FetchRequest) -> CachedResponse {
        let key = req.cache_key();
        let cached = self.lookup(&key);

        if let Some(response) = &cached {
            if !self.is_expired(&Self::request_target(&req.url), &key) {
                self.record(|s| s.record_hit());
                return response.clone();
            }
        }

        match self.fetcher.fetch(req).await {
            Ok(fetched) => {
                self.record(|s| s.record_miss());
                self.store_if_safe(req, &key, &fetched);
                fetched.response
            }
            Err(err) => {
                warn!(url = %req.url, error = %err, "cache-first fetch failed, falling back");
                self.record(|s| s.record_offline_fallback());
                cached.unwrap_or_else(CachedResponse::offline)
            }
        }
    }

    /// Serve the cached entry immediately and refresh it in the background;
    /// the spawned fetch is not cancelled when the cache wins.
    async fn stale_while_revalidate(&self, req: &FetchRequest) -> CachedResponse {
        let key = req.cache_key();

        if let Some(cached) = self.lookup(&key) {
            self.record(|s| s.record_hit());
            let manager = self.clone();
            let req = req.clone();
            tokio::spawn(async move {
                manager.revalidate(&req).await;
            });
            return cached;
        }

        self.record(|s| s.record_miss());
        match self.fetcher.fetch(req).await {
            Ok(fetched) => {
                self.store_if_safe(req, &key, &fetched);
                fetched.response
            }
            Err(err) => {
                warn!(url = %req.url, error = %err, "revalidate fetch failed with empty cache");
                self.record(|s| s.record_offline_fallback());
                CachedResponse::offline()
            }
        }
    }

    /// Refreshes the stored entry for `req`. Failures are logged and
    /// dropped; the next request simply sees the older entry.
    pub async fn revalidate(&self, req: &FetchRequest) {
        match self.fetcher.fetch(req).await {
            Ok(fetched) => {
                let key = req.cache_key();
                self.store_if_safe(req, &key, &fetched);
                self.record(|s| s.record_revalidation());
            }
            Err(err) => {
                debug!(url = %req.url, error = %err, "background revalidation failed");
            }
        }
    }

    /// Attempt network, fall back to the stored entry or a synthetic 503.
    async fn network_first(&self, req: &FetchRequest) -> CachedResponse {
        let key = req.cache_key();
        match self.fetcher.fetch(req).await {
            Ok(fetched) => {
                self.record(|s| s.record_miss());
                self.store_if_safe(req, &key, &fetched);
                fetched.response
            }
            Err(err) => {
                warn!(url = %req.url, error = %err, "network-first fetch failed, falling back to cache");
                self.record(|s| s.record_offline_fallback());
                self.lookup(&key).unwrap_or_else(CachedResponse::offline)
            }
        }
    }

    // == Safety Gate ==
    /// Only same-origin requests with successful, same-origin responses are
    /// persisted. A redirect chain that left the origin is the moral
    /// equivalent of an opaque response.
    fn is_safe_to_cache(&self, req: &FetchRequest, fetched: &FetchedResponse) -> bool {
        if req.url.origin() != self.origin {
            return false;
        }
        if !fetched.response.is_success() {
            return false;
        }
        if fetched.final_url.origin() != self.origin {
            return false;
        }
        true
    }

    fn store_if_safe(&self, req: &FetchRequest, key: &str, fetched: &FetchedResponse) {
        if !self.is_safe_to_cache(req, fetched) {
            return;
        }
        if let Err(err) = self.persist(key, &fetched.response) {
            warn!(key = %key, error = %err, "failed to persist cache entry");
        }
    }

    fn persist(&self, key: &str, response: &CachedResponse) -> Result<()> {
        self.store.put(&self.store_name, key, response.clone())?;
        let meta = CachedResponse::json(&EntryMeta::now())?;
        self.store.put(&self.meta_name, key, meta)?;
        Ok(())
    }

    /// Store failures count as misses.
    fn lookup(&self, key: &str) -> Option<CachedResponse> {
        self.store.lookup(&self.store_name, key).unwrap_or_default()
    }

    // == TTL ==
    /// Missing or unreadable metadata counts as expired.
    fn is_expired(&self, target: &str, key: &str) -> bool {
        let Some(meta) = self.lookup_meta(key) else {
            return true;
        };
        let ttl = ttl_for(&self.patterns, target);
        meta.age_ms() as u128 > ttl.as_millis()
    }

    fn lookup_meta(&self, key: &str) -> Option<EntryMeta> {
        let resp = self.store.lookup(&self.meta_name, key).ok().flatten()?;
        serde_json::from_slice(&resp.body).ok()
    }

    // == Sweep ==
    /// Removes every entry past its TTL, with its metadata, then drops any
    /// metadata record whose response entry is gone (expired here, or purged
    /// by a generation bump). Lazy per-lookup expiry is the correctness
    /// mechanism; this keeps both stores bounded.
    pub fn sweep_expired(&self) -> usize {
        let Ok(keys) = self.store.keys(&self.store_name) else {
            return 0;
        };
        let mut removed = 0;
        for key in keys {
            let Some(target) = key_url(&key)
                .and_then(|u| Url::parse(u).ok())
                .map(|u| Self::request_target(&u))
            else {
                continue;
            };
            if self.is_expired(&target, &key) {
                if self.store.delete(&self.store_name, &key).unwrap_or(false) {
                    let _ = self.store.delete(&self.meta_name, &key);
                    removed += 1;
                }
            }
        }

        let live: HashSet<String> = self
            .store
            .keys(&self.store_name)
            .unwrap_or_default()
            .into_iter()
            .collect();
        for key in self.store.keys(&self.meta_name).unwrap_or_default() {
            if !live.contains(&key) && self.store.delete(&self.meta_name, &key).unwrap_or(false) {
                removed += 1;
            }
        }
        removed
    }

    fn record(&self, f: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            f(&mut stats);
        }
    }
}
