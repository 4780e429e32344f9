//! Pattern Table Module
//!
//! Ordered pattern rules mapping each request to a cache strategy. Rules
//! are matched against the request target (path and query), never the
//! upstream authority, and evaluated first-match-wins in a fixed order:
//! network-only,
//! then cache-first, then stale-while-revalidate; anything unmatched falls
//! back to network-first.

use regex::RegexSet;

// == Strategy ==
/// How a GET request interacts with the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Never consult or write the store
    NetworkOnly,
    /// Serve from store unless missing or expired
    CacheFirst,
    /// Serve from store, refresh it in the background
    StaleWhileRevalidate,
    /// Attempt network, fall back to store on failure
    NetworkFirst,
}

// == Pattern Sets ==
/// Dynamic API endpoints that must never be served stale.
pub const NETWORK_ONLY_PATTERNS: &[&str] = &[
    "/message", "/settings", "/chat", "/task", "/agent", "/file", "/log", "/poll", "/csrf",
    "/login", "/logout",
];

/// Long-lived static assets: vendor libraries, public images, fonts.
pub const CACHE_FIRST_PATTERNS: &[&str] = &["/vendor/", "/public/", r"\.woff2?$|\.ttf$"];

/// App assets that tolerate one stale serve while refreshing.
pub const STALE_REVALIDATE_PATTERNS: &[&str] = &[r"\.css$", r"\.js$", "/components/"];

// == Pattern Table ==
/// Compiled pattern rules, static for the process lifetime.
#[derive(Debug)]
pub struct PatternTable {
    network_only: RegexSet,
    cache_first: RegexSet,
    stale_revalidate: RegexSet,
}

impl PatternTable {
    pub fn new() -> Self {
        // The pattern constants are compile-time fixtures; a failure here is
        // a programming error, not a runtime condition.
        let compile = |patterns: &[&str]| {
            RegexSet::new(patterns).expect("static pattern table compiles")
        };
        Self {
            network_only: compile(NETWORK_ONLY_PATTERNS),
            cache_first: compile(CACHE_FIRST_PATTERNS),
            stale_revalidate: compile(STALE_REVALIDATE_PATTERNS),
        }
    }

    /// Picks the strategy for a request target, first match wins.
    pub fn classify(&self, target: &str) -> Strategy {
        if self.network_only.is_match(target) {
            return Strategy::NetworkOnly;
        }
        if self.cache_first.is_match(target) {
            return Strategy::CacheFirst;
        }
        if self.stale_revalidate.is_match(target) {
            return Strategy::StaleWhileRevalidate;
        }
        Strategy::NetworkFirst
    }

    /// Whether the request target belongs to the long-TTL static asset class.
    ///
    /// Checked independently of `classify` because TTL class and serving
    /// strategy are separate questions for the expiry logic.
    pub fn is_cache_first(&self, target: &str) -> bool {
        self.cache_first.is_match(target)
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::new()
    }
}
