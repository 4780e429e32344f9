//! Background Tasks Module
//!
//! Contains background tasks that run periodically during gateway operation.
//!
//! # Tasks
//! - Expiry sweep: removes cache entries past their TTL at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
