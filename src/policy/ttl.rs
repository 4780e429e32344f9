//! TTL Policy Module
//!
//! Maps each request target to a freshness window. Three classes:
//! long-lived vendor and static assets, short-lived HTML documents, and
//! everything else.

use std::time::Duration;

use super::patterns::PatternTable;

// == TTL Classes ==
/// 7 days for vendor libraries, public assets, and fonts.
pub const TTL_VENDOR: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// 1 day for other app assets.
pub const TTL_ASSETS: Duration = Duration::from_secs(24 * 60 * 60);

/// 1 hour for HTML documents.
pub const TTL_HTML: Duration = Duration::from_secs(60 * 60);

/// Freshness window for a request target.
///
/// Static asset classification takes precedence; a target is treated as
/// an HTML document when it ends in `.html` or a trailing slash.
pub fn ttl_for(patterns: &PatternTable, target: &str) -> Duration {
    if patterns.is_cache_first(target) {
        return TTL_VENDOR;
    }
    if target.ends_with(".html") || target.ends_with('/') {
        return TTL_HTML;
    }
    TTL_ASSETS
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_assets_get_long_ttl() {
        let table = PatternTable::new();
        assert_eq!(
            ttl_for(&table, "/vendor/katex.min.js"),
            TTL_VENDOR
        );
        assert_eq!(
            ttl_for(&table, "/fonts/inter.woff2"),
            TTL_VENDOR
        );
    }

    #[test]
    fn test_html_gets_short_ttl() {
        let table = PatternTable::new();
        assert_eq!(ttl_for(&table, "/index.html"), TTL_HTML);
        assert_eq!(ttl_for(&table, "/"), TTL_HTML);
        assert_eq!(ttl_for(&table, "/docs/"), TTL_HTML);
    }

    #[test]
    fn test_other_assets_get_default_ttl() {
        let table = PatternTable::new();
        assert_eq!(ttl_for(&table, "/app.js"), TTL_ASSETS);
        assert_eq!(ttl_for(&table, "/data.json"), TTL_ASSETS);
    }
}
