//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A single cached API response with its storage time and time-to-live.
///
/// The serialized form is the persistent tier's on-disk value layout:
/// `{"data": ..., "timestamp": ..., "ttl": ...}` with both times in
/// milliseconds. Entries are only ever replaced whole, never patched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// The cached response body
    pub data: Value,
    /// Storage timestamp (Unix milliseconds)
    #[serde(rename = "timestamp")]
    pub stored_at: u64,
    /// Time-to-live in milliseconds
    pub ttl: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(data: Value, ttl: Duration) -> Self {
        Self {
            data,
            stored_at: current_timestamp_ms(),
            ttl: ttl.as_millis() as u64,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's TTL has elapsed.
    ///
    /// An entry is valid iff `now - stored_at <= ttl`; anything past that
    /// boundary must be treated as absent by normal reads, even while the
    /// entry is still physically present for the stale-fallback path.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms().saturating_sub(self.stored_at) > self.ttl
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was stored.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.stored_at)
    }

    // == Remaining TTL ==
    /// Remaining TTL in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.ttl.saturating_sub(self.age_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
