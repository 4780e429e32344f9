//! Manager Module
//!
//! The cache manager and its network seam.

mod fetcher;
#[allow(clippy::module_inception)]
mod manager;

pub(crate) use fetcher::is_hop_by_hop;
pub use fetcher::{FetchRequest, FetchedResponse, Fetcher, HttpFetcher};
pub use manager::CacheManager;
