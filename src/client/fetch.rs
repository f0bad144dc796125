//! Cached Fetch Module
//!
//! Wraps the network transport with the two-tier cache: cache consult
//! before the network, write-through on success, stale fallback on
//! failure, and single-flight deduplication of identical requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::cache::{CacheCoordinator, CacheEntry};
use crate::client::resources::{FetchMode, Resource};
use crate::client::transport::Transport;
use crate::error::{ClientError, Result};

struct Inflight {
    id: u64,
    started: Instant,
    sender: broadcast::Sender<Result<Value>>,
}

// == Cached Fetcher ==
/// Read path of the client: cache in front of the transport.
///
/// Concurrent calls for the same cache key within the resource's dedupe
/// window share one network request; the outcome is broadcast to every
/// waiter. A request whose caller disappears still writes its result
/// through to the cache for future consumers.
pub struct CachedFetcher {
    transport: Arc<dyn Transport>,
    cache: Arc<CacheCoordinator>,
    inflight: Mutex<HashMap<String, Inflight>>,
    next_id: Mutex<u64>,
}

impl CachedFetcher {
    // == Constructor ==
    /// Creates a fetcher over a transport and a cache coordinator.
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<CacheCoordinator>) -> Self {
        Self {
            transport,
            cache,
            inflight: Mutex::new(HashMap::new()),
            next_id: Mutex::new(0),
        }
    }

    /// The coordinator backing this fetcher.
    pub fn cache(&self) -> &Arc<CacheCoordinator> {
        &self.cache
    }

    // == Fetch ==
    /// Resolves a resource to its JSON value.
    ///
    /// `AlwaysFresh` resources go straight to the network. Everything
    /// else consults the cache first; a valid entry is returned without
    /// any network call. On a miss the network result is written through
    /// to both tiers. On a transport failure the last known value is
    /// served regardless of its age; only authentication errors and
    /// misses without any fallback surface to the caller.
    pub async fn fetch(&self, resource: &Resource, base_url: &str) -> Result<Value> {
        let url = resource.url(base_url);

        if resource.policy.mode == FetchMode::AlwaysFresh {
            debug!(%url, "always-fresh fetch");
            return self.transport.get_json(&url).await;
        }

        let key = resource.cache_key();

        // Raw snapshot before the expiry-aware read: that read self-
        // deletes expired entries, and the snapshot is the stale-fallback
        // source if the network fails below.
        let snapshot = self.cache.peek_any(&key);

        if let Some(value) = self.cache.get_cached_data(&key) {
            debug!(%key, "cache hit");
            return Ok(value);
        }
        debug!(%key, "cache miss");

        // Join an in-flight request for the same key when it started
        // within the dedupe window.
        let window = resource.policy.dedupe_window;
        let joined = {
            let inflight = self.inflight.lock().unwrap();
            inflight.get(&key).and_then(|existing| {
                if !window.is_zero() && existing.started.elapsed() < window {
                    Some(existing.sender.subscribe())
                } else {
                    None
                }
            })
        };

        if let Some(mut rx) = joined {
            debug!(%key, "joined in-flight request");
            return match rx.recv().await {
                Ok(result) => result,
                // Leader vanished without broadcasting; fetch directly.
                Err(_) => self.fetch_and_store(&key, &url, resource, snapshot).await,
            };
        }

        let (tx, _) = broadcast::channel(1);
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        self.inflight.lock().unwrap().insert(
            key.clone(),
            Inflight {
                id,
                started: Instant::now(),
                sender: tx.clone(),
            },
        );

        let result = self.fetch_and_store(&key, &url, resource, snapshot).await;

        {
            let mut inflight = self.inflight.lock().unwrap();
            // Only remove our own registration; a slower leader must not
            // unhook a newer one.
            if inflight.get(&key).is_some_and(|entry| entry.id == id) {
                inflight.remove(&key);
            }
        }
        let _ = tx.send(result.clone());

        result
    }

    async fn fetch_and_store(
        &self,
        key: &str,
        url: &str,
        resource: &Resource,
        snapshot: Option<CacheEntry>,
    ) -> Result<Value> {
        match self.transport.get_json(url).await {
            Ok(data) => {
                let ttl = self.cache.cache_duration(&resource.path);
                self.cache.set_cached_data(key, data.clone(), ttl);
                Ok(data)
            }
            // A credential problem must never be papered over with stale
            // data.
            Err(ClientError::AuthRequired) => Err(ClientError::AuthRequired),
            Err(err) => {
                let stale = snapshot.or_else(|| self.cache.peek_any(key));
                match stale {
                    Some(entry) => {
                        warn!(%key, %err, age_ms = entry.age_ms(), "transport failed, serving stale data");
                        Ok(entry.data)
                    }
                    None => Err(err),
                }
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NullStore;
    use crate::models::StockFilters;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const BASE: &str = "http://api.test";

    struct MockTransport {
        responses: Mutex<VecDeque<Result<Value>>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl MockTransport {
        fn new(responses: Vec<Result<Value>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get_json(&self, _url: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Network("mock exhausted".to_string())))
        }

        async fn post_json(&self, _url: &str, _body: &Value) -> Result<Value> {
            unimplemented!("mock transport is read-only")
        }
    }

    fn fetcher(transport: Arc<MockTransport>) -> CachedFetcher {
        let cache = Arc::new(CacheCoordinator::new(100, Box::new(NullStore)));
        CachedFetcher::new(transport, cache)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let transport = Arc::new(MockTransport::new(vec![Ok(json!({"data": []}))]));
        let fetcher = fetcher(transport.clone());
        let resource = Resource::mereks();

        let first = fetcher.fetch(&resource, BASE).await.unwrap();
        let second = fetcher.fetch(&resource, BASE).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1, "second call must be a cache hit");
    }

    #[tokio::test]
    async fn test_stale_served_on_transport_failure() {
        let transport = Arc::new(MockTransport::new(vec![Err(ClientError::Network(
            "down".to_string(),
        ))]));
        let fetcher = fetcher(transport.clone());
        let resource = Resource::mereks();

        // Populate with an immediately-expiring entry.
        fetcher.cache().set_cached_data(
            &resource.cache_key(),
            json!("last known"),
            Duration::from_millis(1),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;

        let value = fetcher.fetch(&resource, BASE).await.unwrap();
        assert_eq!(value, json!("last known"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_without_fallback_propagates() {
        let transport = Arc::new(MockTransport::new(vec![Err(ClientError::Http {
            status: 500,
            message: "boom".to_string(),
        })]));
        let fetcher = fetcher(transport);

        let err = fetcher.fetch(&Resource::mereks(), BASE).await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_auth_error_not_masked_by_stale() {
        let transport = Arc::new(MockTransport::new(vec![Err(ClientError::AuthRequired)]));
        let fetcher = fetcher(transport);
        let resource = Resource::janji_temus();

        fetcher.cache().set_cached_data(
            &resource.cache_key(),
            json!("stale"),
            Duration::from_millis(1),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;

        let err = fetcher.fetch(&resource, BASE).await.unwrap_err();
        assert_eq!(err, ClientError::AuthRequired);
    }

    #[tokio::test]
    async fn test_always_fresh_hits_network_every_time() {
        let transport = Arc::new(MockTransport::new(vec![
            Ok(json!({"id": 42, "status": "tersedia"})),
            Ok(json!({"id": 42, "status": "terjual"})),
        ]));
        let fetcher = fetcher(transport.clone());
        let resource = Resource::stok_mobil(42);

        let first = fetcher.fetch(&resource, BASE).await.unwrap();
        let second = fetcher.fetch(&resource, BASE).await.unwrap();

        assert_eq!(transport.calls(), 2);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_deduplicate() {
        let transport = Arc::new(
            MockTransport::new(vec![Ok(json!({"data": [1]}))])
                .with_delay(Duration::from_millis(50)),
        );
        let fetcher = Arc::new(fetcher(transport.clone()));
        let resource = Resource::stok_mobils(&StockFilters {
            page: Some(1),
            ..Default::default()
        });

        let (a, b) = tokio::join!(
            fetcher.fetch(&resource, BASE),
            fetcher.fetch(&resource, BASE)
        );

        assert_eq!(a.unwrap(), json!({"data": [1]}));
        assert_eq!(b.unwrap(), json!({"data": [1]}));
        assert_eq!(transport.calls(), 1, "requests within the window share one call");
    }

    #[tokio::test]
    async fn test_distinct_params_do_not_deduplicate() {
        let transport = Arc::new(MockTransport::new(vec![
            Ok(json!({"page": 1})),
            Ok(json!({"page": 2})),
        ]));
        let fetcher = Arc::new(fetcher(transport.clone()));
        let page1 = Resource::stok_mobils(&StockFilters {
            page: Some(1),
            ..Default::default()
        });
        let page2 = Resource::stok_mobils(&StockFilters {
            page: Some(2),
            ..Default::default()
        });

        let (a, b) = tokio::join!(fetcher.fetch(&page1, BASE), fetcher.fetch(&page2, BASE));

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_success_overwrites_expired_entry() {
        let transport = Arc::new(MockTransport::new(vec![Ok(json!("fresh"))]));
        let fetcher = fetcher(transport);
        let resource = Resource::mereks();
        let key = resource.cache_key();

        fetcher
            .cache()
            .set_cached_data(&key, json!("old"), Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(20)).await;

        let value = fetcher.fetch(&resource, BASE).await.unwrap();
        assert_eq!(value, json!("fresh"));
        assert_eq!(fetcher.cache().get_cached_data(&key), Some(json!("fresh")));
    }
}
