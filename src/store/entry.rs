//! Cache Entry Module
//!
//! Defines the captured-response value type stored in the cache, the TTL
//! metadata record kept alongside it, and the request key normalization.

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Cached Response ==
/// A captured HTTP response: status, headers, and body bytes.
///
/// This is the value type of the response store. Hop-by-hop headers are
/// stripped before capture, so replaying an entry is just a matter of
/// copying these fields back onto an outgoing response.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers as name/value pairs, hop-by-hop headers excluded
    pub headers: Vec<(String, String)>,
    /// Response body bytes
    pub body: Bytes,
}

impl CachedResponse {
    // == Constructor ==
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// The synthetic response served when the network is down and no usable
    /// cache entry exists.
    pub fn offline() -> Self {
        Self::new(
            503,
            vec![("content-type".to_string(), "text/plain".to_string())],
            "Offline",
        )
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Wraps a serializable value as a JSON response body.
    ///
    /// Metadata records live in the store as ordinary entries with a JSON
    /// body, so the store only ever deals in one value type.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value).map_err(|e| CacheError::Store(e.to_string()))?;
        Ok(Self::new(
            200,
            vec![("content-type".to_string(), "application/json".to_string())],
            body,
        ))
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// == Entry Metadata ==
/// Freshness record for one cached entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Unix timestamp in milliseconds at which the entry was stored
    pub timestamp: i64,
}

impl EntryMeta {
    /// Creates a metadata record stamped with the current time.
    pub fn now() -> Self {
        Self {
            timestamp: current_timestamp_ms(),
        }
    }

    /// Age of the entry in milliseconds, clamped at zero.
    pub fn age_ms(&self) -> i64 {
        (current_timestamp_ms() - self.timestamp).max(0)
    }
}

// == Request Keys ==
/// Normalizes a request into its store key: `METHOD URL`.
pub fn cache_key(method: &str, url: &str) -> String {
    format!("{} {}", method.to_ascii_uppercase(), url)
}

/// Recovers the URL half of a store key.
pub fn key_url(key: &str) -> Option<&str> {
    key.split_once(' ').map(|(_, url)| url)
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
