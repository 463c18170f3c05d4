//! Cache key builders and TTL classes.
//!
//! All cache keys for a given entity share a common prefix so that
//! invalidation can drop every derived entry (detail, search results,
//! aggregates) in one call.

use std::fmt::Write;

/// How long a cached entry should live, by volatility of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Frequently-changing data, e.g. availability-adjacent lookups.
    Short,
    /// Entity detail views.
    Medium,
    /// Expensive aggregates, e.g. rating statistics.
    Long,
    /// Near-static reference data, e.g. the service catalog.
    Day,
}

impl TtlClass {
    pub fn seconds(self) -> u64 {
        match self {
            TtlClass::Short => 300,
            TtlClass::Medium => 1800,
            TtlClass::Long => 7200,
            TtlClass::Day => 86400,
        }
    }
}

/// Prefix under which every barber-derived entry lives.
pub fn barber_prefix(barber_id: i32) -> String {
    format!("barber:{barber_id}")
}

pub fn barber_key(barber_id: i32) -> String {
    format!("barber:{barber_id}:detail")
}

pub fn barber_stats_key(barber_id: i32) -> String {
    format!("barber:{barber_id}:stats")
}

/// Key for a barber search result page. The query parameters are folded
/// into the key so distinct searches cache independently.
pub fn barber_search_key(query: Option<&str>, page: i64, per_page: i64) -> String {
    let mut key = String::from("barbers:search:");
    if let Some(q) = query {
        // write! to String cannot fail
        let _ = write!(key, "q={q}:");
    }
    let _ = write!(key, "page={page}:per={per_page}");
    key
}

pub const BARBER_SEARCH_PREFIX: &str = "barbers:search:";

pub fn service_key(service_id: i32) -> String {
    format!("service:{service_id}:detail")
}

pub const CATALOG_KEY: &str = "catalog:services";

pub const CATALOG_PREFIX: &str = "catalog:";

pub const SERVICE_PREFIX: &str = "service:";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_classes_are_ordered() {
        assert!(TtlClass::Short.seconds() < TtlClass::Medium.seconds());
        assert!(TtlClass::Medium.seconds() < TtlClass::Long.seconds());
        assert!(TtlClass::Long.seconds() < TtlClass::Day.seconds());
    }

    #[test]
    fn barber_keys_share_prefix() {
        let prefix = barber_prefix(42);
        assert!(barber_key(42).starts_with(&prefix));
        assert!(barber_stats_key(42).starts_with(&prefix));
        assert!(!barber_key(7).starts_with(&prefix));
    }

    #[test]
    fn search_keys_differ_by_parameters() {
        let a = barber_search_key(Some("fade"), 1, 20);
        let b = barber_search_key(Some("fade"), 2, 20);
        let c = barber_search_key(None, 1, 20);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with(BARBER_SEARCH_PREFIX));
    }
}
