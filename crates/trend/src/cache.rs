//! In-memory cache of sampled price trends.
//!
//! Uses `DashMap` so concurrent requests for different routes do not
//! contend. Expiry is checked lazily on read; nothing sweeps the map.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use common::{RoutePair, SampleResult};
use dashmap::DashMap;
use tracing::debug;

use crate::clock::Clock;

/// A cached sample with its creation time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub created_at: DateTime<Utc>,
    pub result: SampleResult,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.created_at >= ttl
    }
}

/// Thread-safe trend cache keyed by route.
pub struct TrendCache {
    entries: DashMap<RoutePair, CacheEntry>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TrendCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Return the stored result unless it has expired.
    pub fn get(&self, key: &RoutePair) -> Option<SampleResult> {
        let now = self.clock.now();
        let entry = self.entries.get(key)?;
        if entry.is_expired(now, self.ttl) {
            debug!("Cache entry for {} expired at {}", key, entry.created_at + self.ttl);
            return None;
        }
        Some(entry.result.clone())
    }

    /// Store `result`, replacing any previous entry for `key`.
    pub fn put(&self, key: RoutePair, result: SampleResult) {
        let entry = CacheEntry {
            created_at: self.clock.now(),
            result,
        };
        self.entries.insert(key, entry);
    }

    /// Number of stored entries, expired ones included.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for TrendCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::NaiveDate;
    use common::PricePoint;

    fn route() -> RoutePair {
        RoutePair::new("TPE", "NRT").unwrap()
    }

    fn sample(price: f64) -> SampleResult {
        SampleResult::live(
            vec![PricePoint {
                lead_days: 30,
                price,
                flight_date: NaiveDate::from_ymd_opt(2026, 11, 17).unwrap(),
            }],
            Vec::new(),
        )
    }

    fn cache_with_clock() -> (TrendCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TrendCache::new(Duration::from_secs(3600), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_put_then_get_within_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.put(route(), sample(321.0));

        clock.advance(chrono::Duration::minutes(59));
        assert_eq!(cache.get(&route()), Some(sample(321.0)));
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.put(route(), sample(321.0));

        clock.advance(chrono::Duration::hours(1));
        assert_eq!(cache.get(&route()), None);
        assert_eq!(cache.len(), 1, "expiry is lazy; the entry stays until replaced");
    }

    #[test]
    fn test_second_put_replaces_first() {
        let (cache, _clock) = cache_with_clock();
        cache.put(route(), sample(100.0));
        cache.put(route(), sample(200.0));

        assert_eq!(cache.get(&route()), Some(sample(200.0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_replacement_restarts_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.put(route(), sample(100.0));
        clock.advance(chrono::Duration::minutes(90));
        assert!(cache.get(&route()).is_none());

        cache.put(route(), sample(150.0));
        clock.advance(chrono::Duration::minutes(30));
        assert_eq!(cache.get(&route()), Some(sample(150.0)));
    }

    #[test]
    fn test_routes_are_independent() {
        let (cache, _clock) = cache_with_clock();
        let lax = RoutePair::new("TPE", "LAX").unwrap();
        cache.put(route(), sample(100.0));

        assert!(cache.get(&lax).is_none());
        assert!(cache.get(&RoutePair::new("NRT", "TPE").unwrap()).is_none());
        assert!(cache.get(&RoutePair::new("tpe", "nrt").unwrap()).is_some());
    }
}
