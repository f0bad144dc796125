//! Background Tasks Module
//!
//! Cache lifecycle controller and the tasks it owns: warm-up fetches,
//! per-category invalidation sweeps and the periodic health sampler.
//! All scheduled work lives behind an explicit start/stop lifecycle so
//! no timer fires after teardown.

mod health;
mod sweeper;
mod warmup;

pub use health::{
    sample_health, spawn_health_sampler, CacheHealth, HealthStatus, MEMORY_FILL_WARNING,
    PERSISTENT_SIZE_WARNING_BYTES,
};
pub use sweeper::{spawn_category_sweeps, spawn_sweep_task};
pub use warmup::{spawn_warmup_tasks, warm_essential, warm_popular};

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::client::ApiClient;
use crate::config::Config;

// == Cache Lifecycle ==
/// Owns every background task of the cache: category sweeps, warm-up
/// fetches and the health sampler.
///
/// Created once at application start; `shutdown` aborts every task so
/// nothing fires afterwards. Dropping the lifecycle without calling
/// `shutdown` aborts the tasks too.
pub struct CacheLifecycle {
    tasks: Vec<JoinHandle<()>>,
    health_rx: watch::Receiver<CacheHealth>,
}

impl CacheLifecycle {
    // == Start ==
    /// Spawns the full background schedule:
    /// sweeps per data category, reference-data warm-up immediately, the
    /// first catalog page after `config.warmup_delay`, and a health
    /// sample every `config.health_interval` seconds.
    pub fn start(client: &ApiClient, config: &Config) -> Self {
        info!("starting cache lifecycle");

        let mut tasks = spawn_category_sweeps(client.cache());
        tasks.extend(spawn_warmup_tasks(
            client.clone(),
            Duration::from_secs(config.warmup_delay),
        ));

        let (sampler, health_rx) = spawn_health_sampler(
            client.cache().clone(),
            Duration::from_secs(config.health_interval),
        );
        tasks.push(sampler);

        Self { tasks, health_rx }
    }

    // == Health ==
    /// Subscribes to health samples; the receiver starts at the sample
    /// taken when the lifecycle was created.
    pub fn health(&self) -> watch::Receiver<CacheHealth> {
        self.health_rx.clone()
    }

    // == Shutdown ==
    /// Aborts every owned task. Idempotent.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        info!("cache lifecycle stopped");
    }
}

impl Drop for CacheLifecycle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
