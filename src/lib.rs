//! Cachefront - an offline-first HTTP caching gateway
//!
//! Intercepts requests bound for a configured upstream origin, classifies
//! each by URL pattern, and applies one of four strategies: cache-first,
//! stale-while-revalidate, network-first, or network-only, with per-entry
//! TTL tracking and generational cache invalidation.

pub mod config;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod policy;
pub mod store;
pub mod tasks;

pub use config::Config;
pub use gateway::{create_router, AppState};
pub use manager::{CacheManager, Fetcher, HttpFetcher};
pub use tasks::spawn_cleanup_task;
