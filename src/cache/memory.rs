//! Memory Store Module
//!
//! Bounded in-process cache tier with FIFO eviction and TTL expiration.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::cache::entry::CacheEntry;

// == Memory Info ==
/// Size snapshot of the memory tier.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryInfo {
    /// Current number of entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
}

// == Memory Store ==
/// Bounded mapping from cache key to entry.
///
/// Keys are tracked in insertion order; storing a new key at capacity
/// evicts the least-recently-inserted one first. Overwriting an existing
/// key keeps its position, matching ordered-map semantics.
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, front = oldest
    order: VecDeque<String>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Entries evicted to make room
    evictions: u64,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a new MemoryStore with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            evictions: 0,
        }
    }

    // == Set ==
    /// Stores an entry, evicting the oldest key first when at capacity.
    pub fn set(&mut self, key: &str, entry: CacheEntry) {
        if self.entries.contains_key(key) {
            self.entries.insert(key.to_string(), entry);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.evictions += 1;
                debug!(key = %oldest, "memory tier evicted oldest entry");
            }
        }

        self.entries.insert(key.to_string(), entry);
        self.order.push_back(key.to_string());
    }

    // == Get ==
    /// Returns the entry if present and not expired.
    ///
    /// Expired entries are removed before returning absent.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.remove(key);
                None
            }
            Some(entry) => Some(entry.clone()),
            None => None,
        }
    }

    // == Peek ==
    /// Raw read ignoring TTL; never deletes.
    ///
    /// This is the stale-fallback accessor: expired entries stay visible
    /// here until an expiry-aware read, a sweep, or an eviction removes
    /// them.
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).cloned()
    }

    // == Delete ==
    /// Removes an entry by key, returning whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove(key)
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Keys ==
    /// All keys currently stored, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Info ==
    /// Returns the current size snapshot.
    pub fn info(&self) -> MemoryInfo {
        MemoryInfo {
            size: self.entries.len(),
            max_size: self.capacity,
        }
    }

    /// Number of entries evicted so far.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }
}
