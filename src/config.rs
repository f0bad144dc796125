//! Configuration Module
//!
//! Handles loading and managing client configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::MEMORY_MAX_ENTRIES;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the dealership API
    pub api_base_url: String,
    /// Optional bearer token sent with every request
    pub api_key: Option<String>,
    /// Directory for the persistent cache tier; None disables it
    pub cache_dir: Option<PathBuf>,
    /// Maximum number of entries the memory tier can hold
    pub memory_entries: usize,
    /// Delay in seconds before the popular-data warmup fires
    pub warmup_delay: u64,
    /// Health sampler interval in seconds
    pub health_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - API base URL (default: http://127.0.0.1:8000/api/admin)
    /// - `API_KEY` - Bearer token (default: unset)
    /// - `CACHE_DIR` - Persistent cache directory (default: unset, disk tier disabled)
    /// - `MEMORY_ENTRIES` - Memory tier capacity (default: 100)
    /// - `WARMUP_DELAY` - Popular warmup delay in seconds (default: 2)
    /// - `HEALTH_INTERVAL` - Health sampler interval in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000/api/admin".to_string()),
            api_key: env::var("API_KEY").ok().filter(|key| !key.is_empty()),
            cache_dir: env::var("CACHE_DIR").ok().map(PathBuf::from),
            memory_entries: env::var("MEMORY_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MEMORY_MAX_ENTRIES),
            warmup_delay: env::var("WARMUP_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            health_interval: env::var("HEALTH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api/admin".to_string(),
            api_key: None,
            cache_dir: None,
            memory_entries: MEMORY_MAX_ENTRIES,
            warmup_delay: 2,
            health_interval: 60,
        }
    }
}
