//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache invariants over generated inputs.

use proptest::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheCoordinator, CacheEntry, MemoryStore, NullStore};

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates valid cache-key fragments
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,24}"
}

/// Generates query parameter names
fn param_name_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

/// Generates query parameter values
fn param_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,12}"
}

/// Generates a deduplicated parameter set
fn params_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::hash_map(param_name_strategy(), param_value_strategy(), 0..6)
        .prop_map(|map| map.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* parameter set, the cache key is independent of the order
    // in which parameters were supplied.
    #[test]
    fn prop_key_determinism(params in params_strategy()) {
        let shuffled = {
            let mut reversed = params.clone();
            reversed.reverse();
            reversed
        };

        let a = CacheCoordinator::generate_cache_key("/stok-mobils", &params);
        let b = CacheCoordinator::generate_cache_key("/stok-mobils", &shuffled);
        prop_assert_eq!(a, b);
    }

    // *For any* sequence of distinct keys, the memory tier never exceeds
    // its capacity and evicts in insertion order.
    #[test]
    fn prop_bounded_fifo_eviction(keys in prop::collection::hash_set(key_strategy(), 1..40)) {
        let capacity = 10;
        let mut store = MemoryStore::new(capacity);
        let keys: Vec<String> = keys.into_iter().collect();

        for key in &keys {
            store.set(key, CacheEntry::new(json!(1), TEST_TTL));
        }

        prop_assert!(store.len() <= capacity);
        if keys.len() > capacity {
            prop_assert_eq!(store.len(), capacity);
            // The overflow evicted the earliest insertions
            for evicted in &keys[..keys.len() - capacity] {
                prop_assert!(store.get(evicted).is_none());
            }
            for kept in &keys[keys.len() - capacity..] {
                prop_assert!(store.get(kept).is_some());
            }
        }
    }

    // *For any* stored value, reading it back before expiry returns the
    // exact value that was written.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in "[a-zA-Z0-9 ]{0,64}") {
        let coordinator = CacheCoordinator::new(100, Box::new(NullStore));

        coordinator.set_cached_data(&key, json!(value.clone()), TEST_TTL);
        prop_assert_eq!(coordinator.get_cached_data(&key), Some(json!(value)));
    }

    // *For any* key set, pattern invalidation removes exactly the keys
    // containing the pattern and spares the rest.
    #[test]
    fn prop_pattern_invalidation(
        keys in prop::collection::hash_set(key_strategy(), 1..20),
        pattern in "[a-z0-9_]{1,4}",
    ) {
        let coordinator = CacheCoordinator::new(100, Box::new(NullStore));
        let mut expected: HashMap<String, bool> = HashMap::new();

        for key in &keys {
            coordinator.set_cached_data(key, json!(1), TEST_TTL);
            expected.insert(key.clone(), key.contains(&pattern));
        }

        coordinator.clear_cache_pattern(&pattern);

        for (key, matched) in expected {
            let present = coordinator.get_cached_data(&key).is_some();
            prop_assert_eq!(present, !matched, "key {} matched={}", key, matched);
        }
    }

    // *For any* key, writing V1 then V2 makes reads observe V2.
    #[test]
    fn prop_overwrite_semantics(key in key_strategy()) {
        let coordinator = CacheCoordinator::new(100, Box::new(NullStore));

        coordinator.set_cached_data(&key, json!("v1"), TEST_TTL);
        coordinator.set_cached_data(&key, json!("v2"), TEST_TTL);

        prop_assert_eq!(coordinator.get_cached_data(&key), Some(json!("v2")));
    }
}
