//! Cache Statistics Module
//!
//! Tracks strategy outcomes: hits, misses, background revalidations, and
//! offline fallbacks.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Requests answered from the store
    pub hits: u64,
    /// Requests that had to go to the network
    pub misses: u64,
    /// Completed stale-while-revalidate background refreshes
    pub revalidations: u64,
    /// Network failures answered with a stale entry or synthetic 503
    pub offline_fallbacks: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_revalidation(&mut self) {
        self.revalidations += 1;
    }

    pub fn record_offline_fallback(&mut self) {
        self.offline_fallbacks += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.revalidations, 0);
        assert_eq!(stats.offline_fallbacks, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_counters_increment() {
        let mut stats = CacheStats::new();
        stats.record_revalidation();
        stats.record_revalidation();
        stats.record_offline_fallback();
        assert_eq!(stats.revalidations, 2);
        assert_eq!(stats.offline_fallbacks, 1);
    }
}
