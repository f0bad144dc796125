//! Showroom Client - dealership catalog API client
//!
//! Typed access to a car-dealership REST API fronted by a two-tier
//! cache: a bounded in-memory store over a persistent disk store, with
//! category-based TTL policies, pattern invalidation, a stale-on-error
//! fetch wrapper, revalidating resource subscriptions and a background
//! lifecycle (warm-up, sweeps, health sampling).

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use cache::CacheCoordinator;
pub use client::ApiClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use tasks::CacheLifecycle;
