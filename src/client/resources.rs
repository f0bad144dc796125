//! Resource Descriptors Module
//!
//! One constructor per API resource, binding its endpoint, query
//! parameters and revalidation policy. Identical filters always produce
//! identical descriptors, so the cache key and the dedupe key agree.

use std::time::Duration;

use tracing::warn;

use crate::cache::CacheCoordinator;
use crate::models::{ArticleParams, CarSearchFilters, CatalogParams, StockFilters};

// == Fetch Mode ==
/// How a resource interacts with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Normal path: cache consult, write-through, stale-on-error.
    Cached,
    /// Bypass everything and hit the network on every call. Used by the
    /// stock-item detail page, which must always show current
    /// availability and price.
    AlwaysFresh,
}

// == Revalidate Policy ==
/// Per-resource freshness behavior for subscriptions and deduping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevalidatePolicy {
    /// Periodic background refresh; None disables it
    pub refresh_interval: Option<Duration>,
    /// Window within which identical concurrent requests collapse into
    /// one network call; zero disables joining
    pub dedupe_window: Duration,
    /// Whether a focus event should trigger a refresh
    pub revalidate_on_focus: bool,
    /// Cache interaction mode
    pub mode: FetchMode,
}

impl RevalidatePolicy {
    const fn cached(refresh_secs: u64, dedupe_ms: u64) -> Self {
        Self {
            refresh_interval: Some(Duration::from_secs(refresh_secs)),
            dedupe_window: Duration::from_millis(dedupe_ms),
            revalidate_on_focus: false,
            mode: FetchMode::Cached,
        }
    }

    const fn cached_no_refresh(dedupe_ms: u64) -> Self {
        Self {
            refresh_interval: None,
            dedupe_window: Duration::from_millis(dedupe_ms),
            revalidate_on_focus: false,
            mode: FetchMode::Cached,
        }
    }

    /// Reference data: 30 minute refresh, 5 second dedupe.
    pub const REFERENCE: Self = Self::cached(30 * 60, 5_000);

    /// Car-model listings: 5 minute refresh, 2 second dedupe.
    pub const MODELS: Self = Self::cached(5 * 60, 2_000);

    /// Car-model detail: 10 minute refresh, 2 second dedupe.
    pub const MODEL_DETAIL: Self = Self::cached(10 * 60, 2_000);

    /// Stock listings and the catalog: 2 minute refresh, 1 second dedupe.
    pub const STOCK: Self = Self::cached(2 * 60, 1_000);

    /// Car photos: 15 minute refresh, 2 second dedupe.
    pub const PHOTOS: Self = Self::cached(15 * 60, 2_000);

    /// Service history: 30 second refresh, 500 ms dedupe.
    pub const SERVICE_HISTORY: Self = Self::cached(30, 500);

    /// Appointments: 1 minute refresh, 1 second dedupe, and refresh on
    /// focus because a user action may have changed server state.
    pub const APPOINTMENTS: Self = Self {
        refresh_interval: Some(Duration::from_secs(60)),
        dedupe_window: Duration::from_millis(1_000),
        revalidate_on_focus: true,
        mode: FetchMode::Cached,
    };

    /// Article listings: no background refresh, 5 second dedupe.
    pub const ARTICLES: Self = Self::cached_no_refresh(5_000);

    /// Article detail pages: no background refresh, 30 second dedupe.
    pub const ARTICLE_DETAIL: Self = Self::cached_no_refresh(30_000);

    /// Homepage content: hourly refresh, 30 second dedupe.
    pub const HOMEPAGE: Self = Self::cached(60 * 60, 30_000);

    /// Stock-item detail: every call hits the network.
    pub const ALWAYS_FRESH: Self = Self {
        refresh_interval: None,
        dedupe_window: Duration::ZERO,
        revalidate_on_focus: false,
        mode: FetchMode::AlwaysFresh,
    };
}

// == Resource ==
/// A fully-specified request: endpoint, parameters and policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Endpoint path, e.g. `/stok-mobils` or `/mereks/3`
    pub path: String,
    /// Query parameters in build order (the cache key sorts its own copy)
    pub params: Vec<(String, String)>,
    /// Freshness policy
    pub policy: RevalidatePolicy,
}

impl Resource {
    fn new(path: impl Into<String>, params: Vec<(String, String)>, policy: RevalidatePolicy) -> Self {
        Self {
            path: path.into(),
            params,
            policy,
        }
    }

    // == Catalog resources ==

    /// Car-model listing with search filters.
    pub fn mobils(filters: &CarSearchFilters) -> Self {
        Self::new("/mobils", filters.query_params(), RevalidatePolicy::MODELS)
    }

    /// Single car model.
    pub fn mobil(id: u64) -> Self {
        Self::new(
            format!("/mobils/{id}"),
            Vec::new(),
            RevalidatePolicy::MODEL_DETAIL,
        )
    }

    /// All brands.
    pub fn mereks() -> Self {
        Self::new("/mereks", Vec::new(), RevalidatePolicy::REFERENCE)
    }

    /// Single brand.
    pub fn merek(id: u64) -> Self {
        Self::new(
            format!("/mereks/{id}"),
            Vec::new(),
            RevalidatePolicy::REFERENCE,
        )
    }

    /// All categories.
    pub fn kategoris() -> Self {
        Self::new("/kategoris", Vec::new(), RevalidatePolicy::REFERENCE)
    }

    /// Single category.
    pub fn kategori(id: u64) -> Self {
        Self::new(
            format!("/kategoris/{id}"),
            Vec::new(),
            RevalidatePolicy::REFERENCE,
        )
    }

    /// Variants, optionally limited to one car model.
    pub fn varians(mobil_id: Option<u64>) -> Self {
        let params = mobil_id
            .map(|id| vec![("mobil_id".to_string(), id.to_string())])
            .unwrap_or_default();
        Self::new("/varians", params, RevalidatePolicy::REFERENCE)
    }

    /// Single variant.
    pub fn varian(id: u64) -> Self {
        Self::new(
            format!("/varians/{id}"),
            Vec::new(),
            RevalidatePolicy::REFERENCE,
        )
    }

    // == Stock resources ==

    /// Stock listing with filters.
    pub fn stok_mobils(filters: &StockFilters) -> Self {
        Self::new(
            "/stok-mobils",
            filters.query_params(),
            RevalidatePolicy::STOCK,
        )
    }

    /// Public catalog: available stock only, with sort mapping applied.
    pub fn catalog(params: CatalogParams) -> Self {
        Self::stok_mobils(&params.into_filters())
    }

    /// Stock-item detail. Deliberately uncached: availability and price
    /// must be current on every view.
    pub fn stok_mobil(id: u64) -> Self {
        Self::new(
            format!("/stok-mobils/{id}"),
            Vec::new(),
            RevalidatePolicy::ALWAYS_FRESH,
        )
    }

    /// Car photos, optionally limited to one car model.
    pub fn foto_mobils(mobil_id: Option<u64>) -> Self {
        let params = mobil_id
            .map(|id| vec![("mobil_id".to_string(), id.to_string())])
            .unwrap_or_default();
        Self::new("/foto-mobils", params, RevalidatePolicy::PHOTOS)
    }

    // == Service resources ==

    /// Service history of one stock item.
    pub fn riwayat_servis(stok_mobil_id: u64) -> Self {
        Self::new(
            "/riwayat-servis",
            vec![("stok_mobil_id".to_string(), stok_mobil_id.to_string())],
            RevalidatePolicy::SERVICE_HISTORY,
        )
    }

    /// All appointments.
    pub fn janji_temus() -> Self {
        Self::new("/janji-temus", Vec::new(), RevalidatePolicy::APPOINTMENTS)
    }

    // == Content resources ==

    /// Article listing.
    pub fn articles(params: &ArticleParams) -> Self {
        Self::new("/articles", params.query_params(), RevalidatePolicy::ARTICLES)
    }

    /// Single article by id.
    pub fn article(id: u64) -> Self {
        Self::new(
            format!("/articles/{id}"),
            Vec::new(),
            RevalidatePolicy::ARTICLE_DETAIL,
        )
    }

    /// Article lookup by slug.
    pub fn article_by_slug(slug: &str) -> Self {
        Self::new(
            "/articles",
            vec![("slug".to_string(), slug.to_string())],
            RevalidatePolicy::ARTICLE_DETAIL,
        )
    }

    /// Latest published articles for the homepage.
    pub fn featured_articles(limit: u32) -> Self {
        Self::new(
            "/articles",
            vec![
                ("status".to_string(), "published".to_string()),
                ("limit".to_string(), limit.to_string()),
            ],
            RevalidatePolicy::ARTICLE_DETAIL,
        )
    }

    /// Homepage content.
    pub fn homepage() -> Self {
        Self::new("/homepages", Vec::new(), RevalidatePolicy::HOMEPAGE)
    }

    // == Derived values ==

    /// The deterministic cache key for this resource.
    pub fn cache_key(&self) -> String {
        CacheCoordinator::generate_cache_key(&self.path, &self.params)
    }

    /// The full request URL against a base URL, with parameters encoded.
    pub fn url(&self, base_url: &str) -> String {
        let full = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        if self.params.is_empty() {
            return full;
        }
        let pairs = self
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()));
        match reqwest::Url::parse_with_params(&full, pairs) {
            Ok(url) => url.to_string(),
            Err(err) => {
                warn!(%full, %err, "failed to encode query parameters");
                full
            }
        }
    }
}
