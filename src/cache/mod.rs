//! Cache Module
//!
//! Two-level caching with TTL expiration: a bounded in-memory tier in
//! front of a persistent tier, coordinated with category-based TTL
//! policies and pattern invalidation.

mod category;
mod coordinator;
mod entry;
mod memory;
mod persistent;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use category::{cache_duration_for, category_for_endpoint, endpoint_name, CacheCategory};
pub use coordinator::CacheCoordinator;
pub use entry::{current_timestamp_ms, CacheEntry};
pub use memory::{MemoryInfo, MemoryStore};
pub use persistent::{DiskStore, NullStore, PersistentStore, StoreInfo};
pub use stats::{CacheStats, CategoryInfo};

// == Public Constants ==
/// Maximum number of entries held by the memory tier
pub const MEMORY_MAX_ENTRIES: usize = 100;

/// Namespace prefix for persistent-tier keys, so bulk operations only
/// ever touch this application's entries
pub const STORAGE_PREFIX: &str = "spm_cache_";
