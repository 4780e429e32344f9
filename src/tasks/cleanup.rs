//! Expiry Sweep Task
//!
//! Background task that periodically removes cache entries past their TTL.
//! Lazy per-lookup expiry keeps served responses correct; the sweep keeps
//! the in-memory store from growing without bound between lookups.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::manager::{CacheManager, Fetcher};
use crate::store::ResponseStore;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// # Arguments
/// * `manager` - A clone of the cache manager (clones share the stores)
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task<F: Fetcher, S: ResponseStore>(
    manager: CacheManager<F, S>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = manager.sweep_expired();

            if removed > 0 {
                info!("Expiry sweep: removed {} stale entries", removed);
            } else {
                debug!("Expiry sweep: no stale entries found");
            }
        }
    })
}
