//! Resource Watch Module
//!
//! Revalidating subscriptions over the cached fetcher: each watched
//! resource runs a background refresh task and publishes its state on a
//! watch channel in the familiar data / loading / error shape.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::fetch::CachedFetcher;
use crate::client::resources::{Resource, RevalidatePolicy};
use crate::error::ClientError;

// == Resource State ==
/// Snapshot of a watched resource.
///
/// `data` keeps the last successful value across refresh failures, so
/// consumers keep rendering something useful while `error` reports the
/// most recent problem. The `Arc` makes successive snapshots of an
/// unchanged value pointer-equal.
#[derive(Debug)]
pub struct ResourceState<T> {
    /// Last successfully fetched value
    pub data: Option<Arc<T>>,
    /// Whether a fetch is currently in flight
    pub is_loading: bool,
    /// Error from the most recent fetch, cleared on success
    pub error: Option<ClientError>,
}

impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: true,
            error: None,
        }
    }
}

// == Resource Handle ==
/// Live subscription to a resource.
///
/// Dropping the handle aborts the refresh task; a network request
/// already in flight runs on its own task, completes anyway and
/// populates the cache for future consumers.
pub struct ResourceHandle<T> {
    rx: watch::Receiver<ResourceState<T>>,
    refresh_tx: mpsc::Sender<()>,
    policy: RevalidatePolicy,
    task: JoinHandle<()>,
}

impl<T> ResourceHandle<T> {
    /// The latest published state.
    pub fn current(&self) -> ResourceState<T> {
        self.rx.borrow().clone()
    }

    /// Waits for the next state change and returns it. Returns the
    /// current state if the refresh task has already stopped.
    pub async fn changed(&mut self) -> ResourceState<T> {
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }

    /// Requests an immediate refresh. Coalesces with an already-pending
    /// request.
    pub fn revalidate(&self) {
        let _ = self.refresh_tx.try_send(());
    }

    /// Focus-event hook: refreshes only when the resource's policy opts
    /// in.
    pub fn on_focus(&self) {
        if self.policy.revalidate_on_focus {
            self.revalidate();
        }
    }

    /// The policy this subscription runs under.
    pub fn policy(&self) -> RevalidatePolicy {
        self.policy
    }
}

impl<T> Drop for ResourceHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// == Spawn ==
/// Starts the refresh task for a resource and returns its handle.
pub(crate) fn spawn_resource_watch<T>(
    fetcher: Arc<CachedFetcher>,
    base_url: String,
    resource: Resource,
) -> ResourceHandle<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let (state_tx, state_rx) = watch::channel(ResourceState::default());
    let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);
    let policy = resource.policy;

    let task = tokio::spawn(async move {
        loop {
            state_tx.send_modify(|state| state.is_loading = true);

            // The fetch runs detached so aborting this watch task never
            // cancels it: a late result still lands in the cache for
            // future consumers.
            let fetch = tokio::spawn({
                let fetcher = fetcher.clone();
                let resource = resource.clone();
                let base_url = base_url.clone();
                async move {
                    fetcher
                        .fetch(&resource, &base_url)
                        .await
                        .and_then(|value| {
                            serde_json::from_value::<T>(value).map_err(ClientError::from)
                        })
                }
            });
            let outcome = match fetch.await {
                Ok(outcome) => outcome,
                // Fetch task panicked or the runtime is shutting down
                Err(_) => break,
            };

            state_tx.send_modify(|state| {
                state.is_loading = false;
                match outcome {
                    Ok(parsed) => {
                        state.data = Some(Arc::new(parsed));
                        state.error = None;
                    }
                    Err(err) => {
                        // Keep the previous data visible alongside the error.
                        state.error = Some(err);
                    }
                }
            });

            let stopped = match policy.refresh_interval {
                Some(interval) => {
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => false,
                        trigger = refresh_rx.recv() => trigger.is_none(),
                    }
                }
                None => refresh_rx.recv().await.is_none(),
            };
            if stopped {
                debug!(path = %resource.path, "resource watch stopped");
                break;
            }
        }
    });

    ResourceHandle {
        rx: state_rx,
        refresh_tx,
        policy,
        task,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheCoordinator, NullStore};
    use crate::client::resources::FetchMode;
    use crate::client::transport::Transport;
    use crate::error::Result;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const BASE: &str = "http://api.test";

    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn get_json(&self, _url: &str) -> Result<Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"fetch": n}))
        }

        async fn post_json(&self, _url: &str, _body: &Value) -> Result<Value> {
            unimplemented!()
        }
    }

    fn harness() -> (Arc<CachedFetcher>, Arc<CountingTransport>) {
        let transport = Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(CacheCoordinator::new(100, Box::new(NullStore)));
        (
            Arc::new(CachedFetcher::new(transport.clone(), cache)),
            transport,
        )
    }

    /// An uncached resource so every refresh is observable as a network
    /// call.
    fn fresh_resource(policy_overrides: impl FnOnce(&mut RevalidatePolicy)) -> Resource {
        let mut resource = Resource::stok_mobil(42);
        policy_overrides(&mut resource.policy);
        resource
    }

    #[tokio::test]
    async fn test_watch_delivers_initial_data() {
        let (fetcher, _) = harness();
        let mut handle: ResourceHandle<Value> =
            spawn_resource_watch(fetcher, BASE.to_string(), Resource::mereks());

        let state = handle.changed().await;
        let state = if state.is_loading {
            handle.changed().await
        } else {
            state
        };

        assert_eq!(*state.data.unwrap(), json!({"fetch": 0}));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_revalidate_triggers_refetch() {
        let (fetcher, transport) = harness();
        let resource = fresh_resource(|_| {});
        let mut handle: ResourceHandle<Value> =
            spawn_resource_watch(fetcher, BASE.to_string(), resource);

        while handle.current().data.is_none() {
            handle.changed().await;
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        handle.revalidate();
        loop {
            let state = handle.changed().await;
            if let Some(data) = state.data {
                if data["fetch"] == json!(1) {
                    break;
                }
            }
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_periodic_refresh() {
        let (fetcher, transport) = harness();
        let resource = fresh_resource(|policy| {
            policy.refresh_interval = Some(Duration::from_millis(20));
        });
        let _handle: ResourceHandle<Value> =
            spawn_resource_watch(fetcher, BASE.to_string(), resource);

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(transport.calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_on_focus_respects_policy() {
        let (fetcher, transport) = harness();

        // Focus disabled: no refetch
        let resource = fresh_resource(|_| {});
        let mut handle: ResourceHandle<Value> =
            spawn_resource_watch(fetcher.clone(), BASE.to_string(), resource);
        while handle.current().data.is_none() {
            handle.changed().await;
        }
        handle.on_focus();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        // Focus enabled: refetch
        let resource = fresh_resource(|policy| {
            policy.revalidate_on_focus = true;
        });
        let mut focused: ResourceHandle<Value> =
            spawn_resource_watch(fetcher, BASE.to_string(), resource);
        while focused.current().data.is_none() {
            focused.changed().await;
        }
        focused.on_focus();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_drop_stops_refresh_task() {
        let (fetcher, transport) = harness();
        let resource = fresh_resource(|policy| {
            policy.refresh_interval = Some(Duration::from_millis(10));
        });
        let handle: ResourceHandle<Value> =
            spawn_resource_watch(fetcher, BASE.to_string(), resource);

        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(handle);
        let calls_at_drop = transport.calls.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), calls_at_drop);
    }

    #[tokio::test]
    async fn test_dropped_handle_still_populates_cache() {
        struct SlowTransport;

        #[async_trait]
        impl Transport for SlowTransport {
            async fn get_json(&self, _url: &str) -> Result<Value> {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(json!({"data": ["late"]}))
            }

            async fn post_json(&self, _url: &str, _body: &Value) -> Result<Value> {
                unimplemented!()
            }
        }

        let cache = Arc::new(CacheCoordinator::new(100, Box::new(NullStore)));
        let fetcher = Arc::new(CachedFetcher::new(Arc::new(SlowTransport), cache.clone()));

        let handle: ResourceHandle<Value> =
            spawn_resource_watch(fetcher, BASE.to_string(), Resource::mereks());
        // Abort the watch while the fetch is still in flight
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let entry = cache.peek_any("mereks").expect("late result must be cached");
        assert_eq!(entry.data, json!({"data": ["late"]}));
    }

    #[tokio::test]
    async fn test_error_keeps_previous_data() {
        struct FlakyTransport {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl Transport for FlakyTransport {
            async fn get_json(&self, _url: &str) -> Result<Value> {
                match self.calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Ok(json!("good")),
                    _ => Err(ClientError::Network("down".to_string())),
                }
            }

            async fn post_json(&self, _url: &str, _body: &Value) -> Result<Value> {
                unimplemented!()
            }
        }

        let cache = Arc::new(CacheCoordinator::new(100, Box::new(NullStore)));
        let fetcher = Arc::new(CachedFetcher::new(
            Arc::new(FlakyTransport {
                calls: AtomicUsize::new(0),
            }),
            cache,
        ));

        let resource = fresh_resource(|policy| {
            // Uncached and refreshable, so the second fetch really fails
            policy.mode = FetchMode::AlwaysFresh;
        });
        let mut handle: ResourceHandle<Value> =
            spawn_resource_watch(fetcher, BASE.to_string(), resource);

        while handle.current().data.is_none() {
            handle.changed().await;
        }

        handle.revalidate();
        loop {
            let state = handle.changed().await;
            if state.error.is_some() {
                // The stale value is still there next to the error
                assert_eq!(*state.data.unwrap(), json!("good"));
                break;
            }
        }
    }
}
