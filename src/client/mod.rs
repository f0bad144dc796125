//! Client Module
//!
//! Typed access to the dealership API through the cached fetch wrapper:
//! one-shot reads, revalidating subscriptions and mutation helpers.

pub mod fetch;
pub mod resources;
pub mod transport;
pub mod watch;

pub use fetch::CachedFetcher;
pub use resources::{FetchMode, Resource, RevalidatePolicy};
pub use transport::{HttpTransport, Transport};
pub use watch::{ResourceHandle, ResourceState};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use crate::cache::CacheCoordinator;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{JanjiTemu, NewJanjiTemu};

// == Api Client ==
/// Facade over the cached fetcher for typed resource access.
///
/// Cheap to clone; clones share the same cache, transport and in-flight
/// request table.
#[derive(Clone)]
pub struct ApiClient {
    fetcher: Arc<CachedFetcher>,
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ApiClient {
    // == Constructors ==
    /// Creates a client over the production HTTP transport.
    pub fn new(config: &Config, cache: Arc<CacheCoordinator>) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.api_key.clone()));
        Self::with_transport(transport, cache, config.api_base_url.clone())
    }

    /// Creates a client over an arbitrary transport. Tests inject mocks
    /// here.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        cache: Arc<CacheCoordinator>,
        base_url: String,
    ) -> Self {
        Self {
            fetcher: Arc::new(CachedFetcher::new(transport.clone(), cache)),
            transport,
            base_url,
        }
    }

    /// The cache coordinator backing this client.
    pub fn cache(&self) -> &Arc<CacheCoordinator> {
        self.fetcher.cache()
    }

    /// The configured API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == Reads ==
    /// One-shot typed fetch of a resource through the cache.
    pub async fn get<T: DeserializeOwned>(&self, resource: &Resource) -> Result<T> {
        let value = self.fetcher.fetch(resource, &self.base_url).await?;
        serde_json::from_value(value).map_err(Into::into)
    }

    /// Subscribes to a resource with its revalidation policy.
    pub fn watch<T>(&self, resource: Resource) -> ResourceHandle<T>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        watch::spawn_resource_watch(self.fetcher.clone(), self.base_url.clone(), resource)
    }

    // == Mutations ==
    /// Creates an appointment and returns the stored record.
    ///
    /// The payload is submitted as `pending` with the request timestamp
    /// attached; on success every cached appointment listing is
    /// invalidated so the next read reflects the new record.
    pub async fn create_janji_temu(&self, payload: &NewJanjiTemu) -> Result<JanjiTemu> {
        if let Some(message) = payload.validate() {
            return Err(ClientError::InvalidRequest(message));
        }

        let mut body = serde_json::to_value(payload)?;
        body["status"] = json!("pending");
        body["tanggal_request"] = json!(chrono::Utc::now().to_rfc3339());

        let url = format!("{}/janji-temus", self.base_url.trim_end_matches('/'));
        let response = self.transport.post_json(&url, &body).await?;

        let record = response
            .get("data")
            .cloned()
            .ok_or_else(|| ClientError::MissingData("data".to_string()))?;
        let created: JanjiTemu = serde_json::from_value(record)?;

        info!(id = created.id, "appointment created");
        self.cache().clear_cache_pattern("janji_temus");

        Ok(created)
    }
}
