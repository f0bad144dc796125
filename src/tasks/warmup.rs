//! Cache Warmup Tasks
//!
//! Pre-populates the cache at application start: reference data right
//! away, the first catalog page after a short delay.

use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::{ApiClient, Resource};
use crate::models::CatalogParams;

/// Fetches the reference data (brands, categories, variants) in
/// parallel, logging and swallowing individual failures.
pub async fn warm_essential(client: &ApiClient) {
    info!("warming up reference data");

    let mereks_resource = Resource::mereks();
    let kategoris_resource = Resource::kategoris();
    let varians_resource = Resource::varians(None);

    let (mereks, kategoris, varians) = tokio::join!(
        client.get::<Value>(&mereks_resource),
        client.get::<Value>(&kategoris_resource),
        client.get::<Value>(&varians_resource),
    );

    for (name, result) in [
        ("mereks", mereks),
        ("kategoris", kategoris),
        ("varians", varians),
    ] {
        if let Err(err) = result {
            warn!(name, %err, "warmup fetch failed");
        }
    }
}

/// Fetches the first page of the public catalog.
pub async fn warm_popular(client: &ApiClient) {
    info!("warming up catalog data");

    let catalog = Resource::catalog(CatalogParams {
        page: Some(1),
        ..Default::default()
    });
    if let Err(err) = client.get::<Value>(&catalog).await {
        warn!(%err, "catalog warmup fetch failed");
    }
}

/// Spawns both warmup tasks; the catalog warmup waits `popular_delay`
/// before fetching.
pub fn spawn_warmup_tasks(client: ApiClient, popular_delay: Duration) -> Vec<JoinHandle<()>> {
    let essential_client = client.clone();
    vec![
        tokio::spawn(async move {
            warm_essential(&essential_client).await;
        }),
        tokio::spawn(async move {
            tokio::time::sleep(popular_delay).await;
            warm_popular(&client).await;
        }),
    ]
}
