//! Cache Statistics Module
//!
//! Tracks hit/miss counters and assembles the aggregate diagnostics
//! snapshot over both cache tiers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::cache::category::CacheCategory;
use crate::cache::memory::MemoryInfo;
use crate::cache::persistent::StoreInfo;

// == Counters ==
/// Lock-free hit/miss counters shared across readers.
#[derive(Debug, Default)]
pub struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Counters {
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Current hit count.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Current miss count.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

// == Category Info ==
/// One row of the static category configuration, for diagnostics output.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    /// Category label
    pub category: &'static str,
    /// Resource names assigned to the category
    pub resources: Vec<&'static str>,
    /// TTL in milliseconds
    pub duration_ms: u64,
}

// == Cache Stats ==
/// Aggregate statistics over both tiers plus the static policy tables.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Number of reads served from cache
    pub hits: u64,
    /// Number of reads that fell through to the network
    pub misses: u64,
    /// Entries evicted from the memory tier
    pub evictions: u64,
    /// Memory tier snapshot
    pub memory: MemoryInfo,
    /// Persistent tier snapshot
    pub persistent: StoreInfo,
    /// Static category configuration
    pub categories: Vec<CategoryInfo>,
}

impl CacheStats {
    /// Builds the static category table shared by every snapshot.
    pub fn category_table() -> Vec<CategoryInfo> {
        CacheCategory::ALL
            .iter()
            .map(|category| CategoryInfo {
                category: category.label(),
                resources: category.resource_names().to_vec(),
                duration_ms: category.duration().as_millis() as u64,
            })
            .collect()
    }

    /// Cache hit rate, 0.0 when no reads have happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Memory fill ratio in the range 0.0..=1.0.
    pub fn memory_fill_ratio(&self) -> f64 {
        if self.memory.max_size == 0 {
            0.0
        } else {
            self.memory.size as f64 / self.memory.max_size as f64
        }
    }
}
