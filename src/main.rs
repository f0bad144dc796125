//! Showroom Client - diagnostic binary
//!
//! Wires the full stack together: cache, transport, client and the
//! background lifecycle, then reports cache health until interrupted.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showroom_client::cache::{CacheCoordinator, DiskStore, NullStore, PersistentStore};
use showroom_client::{ApiClient, CacheLifecycle, Config};

/// Main entry point for the showroom client.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Construct the two-tier cache and the API client
/// 4. Start the cache lifecycle (warm-up, sweeps, health sampler)
/// 5. Log health transitions until SIGINT/SIGTERM
/// 6. Tear down all background tasks
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showroom_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting showroom client");

    let config = Config::from_env();
    info!(
        base_url = %config.api_base_url,
        cache_dir = ?config.cache_dir,
        memory_entries = config.memory_entries,
        "Configuration loaded"
    );

    let persistent: Box<dyn PersistentStore> = match &config.cache_dir {
        Some(dir) => Box::new(DiskStore::new(dir.clone())),
        None => {
            warn!("CACHE_DIR not set, persistent tier disabled");
            Box::new(NullStore)
        }
    };
    let cache = Arc::new(CacheCoordinator::new(config.memory_entries, persistent));
    let client = ApiClient::new(&config, cache.clone());
    info!("Cache and client initialized");

    let mut lifecycle = CacheLifecycle::start(&client, &config);
    let mut health = lifecycle.health();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = health.changed() => {
                if changed.is_err() {
                    break;
                }
                let sample = health.borrow().clone();
                info!(
                    status = ?sample.status,
                    memory_fill = sample.memory_fill,
                    persistent_bytes = sample.persistent_bytes,
                    "{}", sample.message
                );
            }
        }
    }

    lifecycle.shutdown();
    let stats = cache.get_cache_stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        "Shutdown complete"
    );

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .context("Failed to install Ctrl+C handler")
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<anyhow::Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
            result.map(|_| ())
        }
        result = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
            result
        }
    }
}
