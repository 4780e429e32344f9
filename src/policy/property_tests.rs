//! Property-Based Tests for the Policy Module
//!
//! Uses proptest to verify that pattern classification and TTL mapping are
//! total, deterministic, and consistent with each other.

use proptest::prelude::*;

// proptest's prelude exports its own `Strategy` trait
use crate::policy::Strategy as CacheStrategy;
use crate::policy::{ttl_for, PatternTable, TTL_ASSETS, TTL_HTML, TTL_VENDOR};

// == Strategies ==
/// Generates realistic request targets with varied segments and suffixes.
fn target_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[a-z0-9_-]{1,10}", 0..4),
        prop_oneof![
            Just("".to_string()),
            Just(".js".to_string()),
            Just(".css".to_string()),
            Just(".html".to_string()),
            Just(".woff2".to_string()),
            Just(".png".to_string()),
            Just("/".to_string()),
        ],
    )
        .prop_map(|(segments, suffix)| {
            format!("/{}{}", segments.join("/"), suffix)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every target maps to exactly one strategy, and the mapping is stable.
    #[test]
    fn prop_classification_total_and_deterministic(target in target_strategy()) {
        let table = PatternTable::new();
        let first = table.classify(&target);
        let second = table.classify(&target);
        prop_assert_eq!(first, second);
    }

    // Every target maps to one of the three TTL classes.
    #[test]
    fn prop_ttl_is_one_of_three_classes(target in target_strategy()) {
        let table = PatternTable::new();
        let ttl = ttl_for(&table, &target);
        prop_assert!(
            ttl == TTL_VENDOR || ttl == TTL_ASSETS || ttl == TTL_HTML,
            "unexpected TTL {:?} for {}", ttl, target
        );
    }

    // Network-only patterns take precedence over any later rule, whatever
    // extension the target carries.
    #[test]
    fn prop_network_only_wins(segment in "[a-z0-9_-]{1,10}", suffix in prop_oneof![
        Just(""), Just(".js"), Just(".css"), Just(".woff2"), Just(".html")
    ]) {
        let table = PatternTable::new();
        let target = format!("/chat/{segment}{suffix}");
        prop_assert_eq!(table.classify(&target), CacheStrategy::NetworkOnly);
    }

    // Vendor paths are always cache-first and always carry the 7-day TTL.
    #[test]
    fn prop_vendor_paths_cache_first_with_long_ttl(name in "[a-z0-9_-]{1,12}") {
        let table = PatternTable::new();
        let target = format!("/vendor/{name}");
        prop_assert_eq!(table.classify(&target), CacheStrategy::CacheFirst);
        prop_assert_eq!(ttl_for(&table, &target), TTL_VENDOR);
    }
}
