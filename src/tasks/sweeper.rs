//! Invalidation Sweep Tasks
//!
//! Background tasks that periodically clear cached keys per data
//! category, bounding staleness independently of lazy expiry.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheCategory, CacheCoordinator};

/// Spawns a recurring sweep that clears every key matching one of the
/// patterns at each interval.
///
/// Sweeps are fire-and-forget and idempotent: clearing a key that is
/// already gone is a no-op, so overlapping sweeps for the same category
/// are harmless.
pub fn spawn_sweep_task(
    cache: Arc<CacheCoordinator>,
    patterns: Vec<&'static str>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?patterns, ?interval, "starting invalidation sweep");

        loop {
            tokio::time::sleep(interval).await;

            for pattern in &patterns {
                cache.clear_cache_pattern(pattern);
            }
            debug!(?patterns, "invalidation sweep completed");
        }
    })
}

/// Spawns the three standard category sweeps:
/// reference data every 30 minutes, stock listings every 5 minutes,
/// appointments every 60 seconds.
pub fn spawn_category_sweeps(cache: &Arc<CacheCoordinator>) -> Vec<JoinHandle<()>> {
    vec![
        spawn_sweep_task(
            cache.clone(),
            vec!["mereks", "kategoris", "varians"],
            CacheCategory::Static.duration(),
        ),
        spawn_sweep_task(
            cache.clone(),
            vec!["stok_mobils"],
            CacheCategory::Dynamic.duration(),
        ),
        spawn_sweep_task(
            cache.clone(),
            vec!["janji_temus"],
            CacheCategory::Realtime.duration(),
        ),
    ]
}
