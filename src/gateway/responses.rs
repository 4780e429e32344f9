//! Response DTOs for the gateway's operational endpoints.

use serde::Serialize;

use crate::store::CacheStats;

/// Response body for GET /_cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Requests answered from the store
    pub hits: u64,
    /// Requests that went to the network
    pub misses: u64,
    /// Completed background revalidations
    pub revalidations: u64,
    /// Degraded serves after network failure
    pub offline_fallbacks: u64,
    /// Entries currently in the main store
    pub entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, entries: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            revalidations: stats.revalidations,
            offline_fallbacks: stats.offline_fallbacks,
            entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for GET /_cache/health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
