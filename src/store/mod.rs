//! Store Module
//!
//! The generational response store: captured responses keyed by normalized
//! request, grouped into named store generations, with TTL metadata held as
//! sibling entries in a dedicated metadata store.

mod entry;
mod memory;
mod stats;

// Re-export public types
pub use entry::{cache_key, current_timestamp_ms, key_url, CachedResponse, EntryMeta};
pub use memory::{MemoryStore, ResponseStore};
pub use stats::CacheStats;
