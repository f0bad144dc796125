//! Cache Category Module
//!
//! Maps API endpoints to TTL durations through a fixed category table.

use std::time::Duration;

use serde::Serialize;

// == Cache Category ==
/// Freshness class of a cached resource.
///
/// Categories are checked in declaration order when classifying an
/// endpoint, and the first resource-name substring match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheCategory {
    /// Rarely changes (brands, categories, variants) - 30 minutes
    Static,
    /// Changes occasionally (car models, car photos) - 15 minutes
    SemiStatic,
    /// Changes regularly (stock listings) - 5 minutes
    Dynamic,
    /// Changes frequently (appointments) - 1 minute
    Realtime,
    /// Time-sensitive (service history) - 30 seconds
    Critical,
}

impl CacheCategory {
    /// All categories in classification priority order.
    pub const ALL: [CacheCategory; 5] = [
        CacheCategory::Static,
        CacheCategory::SemiStatic,
        CacheCategory::Dynamic,
        CacheCategory::Realtime,
        CacheCategory::Critical,
    ];

    /// TTL assigned to entries of this category.
    pub fn duration(self) -> Duration {
        match self {
            CacheCategory::Static => Duration::from_secs(30 * 60),
            CacheCategory::SemiStatic => Duration::from_secs(15 * 60),
            CacheCategory::Dynamic => Duration::from_secs(5 * 60),
            CacheCategory::Realtime => Duration::from_secs(60),
            CacheCategory::Critical => Duration::from_secs(30),
        }
    }

    /// Resource names belonging to this category.
    ///
    /// Names use the normalized (underscore) spelling so they line up with
    /// cache keys and invalidation patterns.
    pub fn resource_names(self) -> &'static [&'static str] {
        match self {
            CacheCategory::Static => &["mereks", "kategoris", "varians"],
            CacheCategory::SemiStatic => &["mobils", "foto_mobils"],
            CacheCategory::Dynamic => &["stok_mobils"],
            CacheCategory::Realtime => &["janji_temus"],
            CacheCategory::Critical => &["riwayat_servis"],
        }
    }

    /// Upper-case label used in diagnostics output.
    pub fn label(self) -> &'static str {
        match self {
            CacheCategory::Static => "STATIC",
            CacheCategory::SemiStatic => "SEMI_STATIC",
            CacheCategory::Dynamic => "DYNAMIC",
            CacheCategory::Realtime => "REALTIME",
            CacheCategory::Critical => "CRITICAL",
        }
    }
}

// == Endpoint Classification ==
/// Extracts the normalized resource name from an endpoint or URL.
///
/// Takes the last path segment, strips any query string, and folds
/// hyphens to underscores so `/riwayat-servis?x=1` classifies the same
/// as the `riwayat_servis` cache keys it produces.
pub fn endpoint_name(endpoint: &str) -> String {
    endpoint
        .split('/')
        .next_back()
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("")
        .replace('-', "_")
}

/// Classifies an endpoint into its cache category.
///
/// Matches by substring containment against each category's resource
/// names in priority order; unclassified endpoints default to
/// `SemiStatic`. An endpoint whose name embeds another resource's name
/// (`stok_mobils` contains `mobils`) resolves to the earlier category.
pub fn category_for_endpoint(endpoint: &str) -> CacheCategory {
    let name = endpoint_name(endpoint);
    for category in CacheCategory::ALL {
        if category
            .resource_names()
            .iter()
            .any(|resource| name.contains(resource))
        {
            return category;
        }
    }
    CacheCategory::SemiStatic
}

/// Returns the TTL for an endpoint, `SemiStatic` when unclassified.
pub fn cache_duration_for(endpoint: &str) -> Duration {
    category_for_endpoint(endpoint).duration()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_name_extraction() {
        assert_eq!(endpoint_name("/mereks"), "mereks");
        assert_eq!(endpoint_name("/riwayat-servis?x=1"), "riwayat_servis");
        assert_eq!(
            endpoint_name("http://127.0.0.1:8000/api/admin/janji-temus"),
            "janji_temus"
        );
        assert_eq!(endpoint_name(""), "");
    }

    #[test]
    fn test_static_endpoints() {
        assert_eq!(category_for_endpoint("/mereks"), CacheCategory::Static);
        assert_eq!(category_for_endpoint("/kategoris"), CacheCategory::Static);
        assert_eq!(category_for_endpoint("/varians"), CacheCategory::Static);
        assert_eq!(
            cache_duration_for("/mereks"),
            Duration::from_secs(30 * 60)
        );
    }

    #[test]
    fn test_critical_endpoint_with_query() {
        assert_eq!(
            category_for_endpoint("/riwayat-servis?x=1"),
            CacheCategory::Critical
        );
        assert_eq!(
            cache_duration_for("/riwayat-servis?x=1"),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_realtime_endpoint() {
        assert_eq!(
            category_for_endpoint("/janji-temus"),
            CacheCategory::Realtime
        );
    }

    #[test]
    fn test_unknown_endpoint_defaults_to_semi_static() {
        assert_eq!(
            category_for_endpoint("/homepages"),
            CacheCategory::SemiStatic
        );
        assert_eq!(
            cache_duration_for("/homepages"),
            Duration::from_secs(15 * 60)
        );
    }

    #[test]
    fn test_stock_listing_shadowed_by_mobils() {
        // "stok_mobils" contains "mobils", so the SemiStatic rule wins
        // before the Dynamic rule is consulted.
        assert_eq!(
            category_for_endpoint("/stok-mobils"),
            CacheCategory::SemiStatic
        );
    }

    #[test]
    fn test_priority_order_is_fixed() {
        assert_eq!(
            CacheCategory::ALL[0..2],
            [CacheCategory::Static, CacheCategory::SemiStatic]
        );
        assert_eq!(CacheCategory::ALL[4], CacheCategory::Critical);
    }

    #[test]
    fn test_durations_table() {
        assert_eq!(
            CacheCategory::SemiStatic.duration(),
            Duration::from_secs(15 * 60)
        );
        assert_eq!(
            CacheCategory::Dynamic.duration(),
            Duration::from_secs(5 * 60)
        );
        assert_eq!(CacheCategory::Realtime.duration(), Duration::from_secs(60));
    }

    #[test]
    fn test_every_resource_name_in_exactly_one_category() {
        let mut seen = std::collections::HashSet::new();
        for category in CacheCategory::ALL {
            for name in category.resource_names() {
                assert!(seen.insert(*name), "{name} listed twice");
            }
        }
    }
}
