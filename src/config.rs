//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;

/// Paths fetched and stored during the install phase.
pub const DEFAULT_PRECACHE_PATHS: &[&str] =
    &["/", "/index.html", "/index.css", "/index.js", "/manifest.json"];

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin the gateway fronts, e.g. `http://127.0.0.1:8080`
    pub upstream_origin: String,
    /// HTTP listen port
    pub server_port: u16,
    /// Cache store generation; bumping it invalidates all prior entries
    pub cache_version: u32,
    /// Expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Timeout applied to individual upstream fetches, in seconds
    pub upstream_timeout: u64,
    /// Root-relative paths precached during install
    pub precache_paths: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTREAM_ORIGIN` - Origin to proxy (default: http://127.0.0.1:8080)
    /// - `SERVER_PORT` - HTTP listen port (default: 3000)
    /// - `CACHE_VERSION` - Store generation number (default: 1)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `UPSTREAM_TIMEOUT` - Upstream fetch timeout in seconds (default: 30)
    /// - `PRECACHE_PATHS` - Comma-separated precache list (default: root assets)
    pub fn from_env() -> Self {
        Self {
            upstream_origin: env::var("UPSTREAM_ORIGIN")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cache_version: env::var("CACHE_VERSION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            upstream_timeout: env::var("UPSTREAM_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            precache_paths: env::var("PRECACHE_PATHS")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|p| p.trim().to_string())
                        .filter(|p| !p.is_empty())
                        .collect()
                })
                .unwrap_or_else(default_precache_paths),
        }
    }

    /// Name of the main response store for this generation.
    pub fn store_name(&self) -> String {
        format!("cache-v{}", self.cache_version)
    }

    /// Name of the TTL metadata store.
    ///
    /// Unversioned on purpose: metadata survives generation bumps and simply
    /// goes unused until the matching entries are refetched.
    pub fn meta_store_name(&self) -> String {
        "meta-v1".to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_origin: "http://127.0.0.1:8080".to_string(),
            server_port: 3000,
            cache_version: 1,
            cleanup_interval: 60,
            upstream_timeout: 30,
            precache_paths: default_precache_paths(),
        }
    }
}

fn default_precache_paths() -> Vec<String> {
    DEFAULT_PRECACHE_PATHS.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.upstream_origin, "http://127.0.0.1:8080");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_version, 1);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.upstream_timeout, 30);
        assert_eq!(config.precache_paths.len(), DEFAULT_PRECACHE_PATHS.len());
    }

    #[test]
    fn test_store_names_follow_version() {
        let config = Config {
            cache_version: 7,
            ..Config::default()
        };
        assert_eq!(config.store_name(), "cache-v7");
        assert_eq!(config.meta_store_name(), "meta-v1");
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("UPSTREAM_ORIGIN");
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_VERSION");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("UPSTREAM_TIMEOUT");
        env::remove_var("PRECACHE_PATHS");

        let config = Config::from_env();
        assert_eq!(config.upstream_origin, "http://127.0.0.1:8080");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.store_name(), "cache-v1");
        assert_eq!(config.precache_paths, default_precache_paths());
    }
}
