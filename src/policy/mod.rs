//! Policy Module
//!
//! Static request-classification rules: the ordered pattern table mapping
//! URLs to cache strategies, and the TTL class per URL.

mod patterns;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use patterns::{
    PatternTable, Strategy, CACHE_FIRST_PATTERNS, NETWORK_ONLY_PATTERNS,
    STALE_REVALIDATE_PATTERNS,
};
pub use ttl::{ttl_for, TTL_ASSETS, TTL_HTML, TTL_VENDOR};
