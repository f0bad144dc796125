//! Cache Health Sampler
//!
//! Periodically samples both cache tiers and classifies overall health
//! against fixed thresholds.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::CacheCoordinator;

/// Memory fill ratio above which health degrades to Warning.
pub const MEMORY_FILL_WARNING: f64 = 0.9;

/// Persistent-tier size above which health degrades to Warning.
pub const PERSISTENT_SIZE_WARNING_BYTES: u64 = 5 * 1024 * 1024;

// == Health Status ==
/// Overall cache health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Error,
}

// == Cache Health ==
/// One health sample.
#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub status: HealthStatus,
    pub message: String,
    /// Sample time, RFC 3339
    pub checked_at: String,
    /// Memory fill ratio 0.0..=1.0
    pub memory_fill: f64,
    /// Persistent tier size in bytes
    pub persistent_bytes: u64,
}

/// Samples both tiers and classifies the result.
pub fn sample_health(cache: &CacheCoordinator) -> CacheHealth {
    let stats = cache.get_cache_stats();
    let memory_fill = stats.memory_fill_ratio();
    let persistent_bytes = stats.persistent.total_bytes;

    let (status, message) = if memory_fill > MEMORY_FILL_WARNING {
        (HealthStatus::Warning, "Memory cache is nearly full")
    } else if persistent_bytes > PERSISTENT_SIZE_WARNING_BYTES {
        (HealthStatus::Warning, "Persistent cache is large")
    } else {
        (HealthStatus::Healthy, "Cache is operating normally")
    };

    CacheHealth {
        status,
        message: message.to_string(),
        checked_at: chrono::Utc::now().to_rfc3339(),
        memory_fill,
        persistent_bytes,
    }
}

/// Spawns the periodic sampler. Each sample is published on the returned
/// watch channel; status transitions are logged.
pub fn spawn_health_sampler(
    cache: Arc<CacheCoordinator>,
    interval: Duration,
) -> (JoinHandle<()>, watch::Receiver<CacheHealth>) {
    let (tx, rx) = watch::channel(sample_health(&cache));

    let handle = tokio::spawn(async move {
        info!(?interval, "starting cache health sampler");

        loop {
            tokio::time::sleep(interval).await;

            let health = sample_health(&cache);
            let previous = tx.send_replace(health.clone());
            if health.status != previous.status {
                match health.status {
                    HealthStatus::Healthy => {
                        info!(message = %health.message, "cache health recovered")
                    }
                    _ => warn!(
                        status = ?health.status,
                        message = %health.message,
                        memory_fill = health.memory_fill,
                        persistent_bytes = health.persistent_bytes,
                        "cache health degraded"
                    ),
                }
            }
        }
    });

    (handle, rx)
}
