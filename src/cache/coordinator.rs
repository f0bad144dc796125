//! Cache Coordinator Module
//!
//! Composes the memory and persistent tiers into one read-through,
//! write-through cache with key generation, TTL policy lookup, pattern
//! invalidation and aggregate statistics.

use std::sync::RwLock;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::category::cache_duration_for;
use crate::cache::entry::CacheEntry;
use crate::cache::memory::MemoryStore;
use crate::cache::persistent::PersistentStore;
use crate::cache::stats::{CacheStats, Counters};

// == Cache Coordinator ==
/// Two-level cache over a bounded memory tier and a persistent tier.
///
/// Constructed once at application start and shared behind an `Arc`;
/// there is no module-level state, so tests build throwaway instances.
pub struct CacheCoordinator {
    /// Fast bounded tier, checked first
    memory: RwLock<MemoryStore>,
    /// Durable tier, checked on memory miss
    persistent: Box<dyn PersistentStore>,
    /// Hit/miss counters
    counters: Counters,
}

impl CacheCoordinator {
    // == Constructor ==
    /// Creates a coordinator with the given memory capacity and
    /// persistent tier.
    pub fn new(memory_capacity: usize, persistent: Box<dyn PersistentStore>) -> Self {
        Self {
            memory: RwLock::new(MemoryStore::new(memory_capacity)),
            persistent,
            counters: Counters::default(),
        }
    }

    // == Key Generation ==
    /// Derives the deterministic cache key for an endpoint and its query
    /// parameters.
    ///
    /// The endpoint path is stripped of its leading slash with `/` and
    /// `-` folded to `_`; parameters are sorted by name so two logically
    /// identical requests always map to the same key.
    pub fn generate_cache_key(endpoint: &str, params: &[(String, String)]) -> String {
        let base = endpoint
            .trim_start_matches('/')
            .replace('/', "_")
            .replace('-', "_");

        if params.is_empty() {
            return base;
        }

        let mut sorted: Vec<&(String, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let query = sorted
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        format!("{base}_{query}")
    }

    // == TTL Policy ==
    /// Returns the TTL for an endpoint per the category tables.
    pub fn cache_duration(&self, endpoint: &str) -> Duration {
        cache_duration_for(endpoint)
    }

    // == Read-Through ==
    /// Returns the cached value for a key, checking memory first and
    /// back-filling it on a persistent hit.
    ///
    /// Promotion re-uses the stored entry verbatim, so a disk hit never
    /// extends an entry's lifetime. Expired entries are lazily removed by
    /// the tier accessors.
    pub fn get_cached_data(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.memory.write().unwrap().get(key) {
            self.counters.record_hit();
            return Some(entry.data);
        }

        if let Some(entry) = self.persistent.get(key) {
            self.memory.write().unwrap().set(key, entry.clone());
            self.counters.record_hit();
            return Some(entry.data);
        }

        self.counters.record_miss();
        None
    }

    // == Write-Through ==
    /// Writes a value to both tiers. Persistent-tier failures are
    /// absorbed by the store itself.
    pub fn set_cached_data(&self, key: &str, data: Value, ttl: Duration) {
        let entry = CacheEntry::new(data, ttl);
        self.memory.write().unwrap().set(key, entry.clone());
        self.persistent.set(key, &entry);
    }

    // == Delete ==
    /// Removes a key from both tiers.
    pub fn delete_cached_data(&self, key: &str) {
        self.memory.write().unwrap().delete(key);
        self.persistent.delete(key);
    }

    // == Stale Accessor ==
    /// Raw read over both tiers ignoring TTL, never deleting.
    ///
    /// This is the documented TTL-check bypass backing the serve-stale-
    /// on-error contract; the cached fetch wrapper is its only intended
    /// caller.
    pub fn peek_any(&self, key: &str) -> Option<CacheEntry> {
        if let Some(entry) = self.memory.read().unwrap().peek(key) {
            return Some(entry);
        }
        self.persistent.peek(key)
    }

    // == Pattern Invalidation ==
    /// Deletes every key containing the substring from both tiers.
    ///
    /// An empty pattern matches every key.
    pub fn clear_cache_pattern(&self, pattern: &str) {
        let mut removed = 0usize;

        {
            let mut memory = self.memory.write().unwrap();
            for key in memory.keys() {
                if key.contains(pattern) {
                    memory.delete(&key);
                    removed += 1;
                }
            }
        }

        for key in self.persistent.keys() {
            if key.contains(pattern) {
                self.persistent.delete(&key);
                removed += 1;
            }
        }

        debug!(pattern, removed, "cache pattern cleared");
    }

    // == Clear All ==
    /// Empties both tiers.
    pub fn clear_all(&self) {
        self.memory.write().unwrap().clear();
        self.persistent.clear();
    }

    // == Stats ==
    /// Aggregate statistics over both tiers plus the static policy
    /// tables.
    pub fn get_cache_stats(&self) -> CacheStats {
        let (memory_info, evictions) = {
            let memory = self.memory.read().unwrap();
            (memory.info(), memory.evictions())
        };
        CacheStats {
            hits: self.counters.hits(),
            misses: self.counters.misses(),
            evictions,
            memory: memory_info,
            persistent: self.persistent.info(),
            categories: CacheStats::category_table(),
        }
    }
}
