//! Memoising wrapper for occupancy oracles.
//!
//! A search expands the same trip from many labels, and concurrent searches
//! often board the same trips. Estimates are cached per (trip, boarding
//! instant) so the underlying model runs once per key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;

use crate::domain::{Occupancy, RailTime, StationName, Trip, TripId};

use super::OccupancyOracle;

/// Cache key: (trip id, boarding instant).
type EstimateKey = (TripId, RailTime);

/// Cached estimate.
type EstimateEntry = Arc<HashMap<StationName, Occupancy>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 10_000,
        }
    }
}

/// An oracle with caching.
pub struct CachedOccupancy<O> {
    inner: O,
    estimates: MokaCache<EstimateKey, EstimateEntry>,
}

impl<O: OccupancyOracle> CachedOccupancy<O> {
    /// Wrap `inner` with a cache built from `config`.
    pub fn new(inner: O, config: &CacheConfig) -> Self {
        let estimates = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, estimates }
    }

    /// Returns the wrapped oracle.
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.estimates.run_pending_tasks();
        self.estimates.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.estimates.invalidate_all();
    }
}

impl<O: OccupancyOracle> OccupancyOracle for CachedOccupancy<O> {
    fn estimate(&self, trip: &Trip, at: RailTime) -> HashMap<StationName, Occupancy> {
        let key = (trip.id().clone(), at);
        let entry = self
            .estimates
            .get_with(key, || Arc::new(self.inner.estimate(trip, at)));
        (*entry).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScheduledTime, Stop};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Oracle that counts how often it is asked.
    #[derive(Default)]
    struct CountingOracle {
        calls: AtomicUsize,
    }

    impl OccupancyOracle for CountingOracle {
        fn estimate(&self, trip: &Trip, _at: RailTime) -> HashMap<StationName, Occupancy> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            trip.stops()
                .iter()
                .map(|s| (s.station.clone(), Occupancy::percent(42)))
                .collect()
        }
    }

    fn make_trip(id: &str) -> Trip {
        let stop = |s: &str, t: &str| {
            Stop::new(StationName::parse(s).unwrap(), ScheduledTime::parse(t).unwrap())
        };
        Trip::new(
            TripId::new(id),
            id,
            vec![stop("Bogor", "04:03"), stop("Manggarai", "05:06")],
        )
    }

    fn at(s: &str) -> RailTime {
        RailTime::parse_iso(s).unwrap()
    }

    #[test]
    fn second_lookup_hits_cache() {
        let cached = CachedOccupancy::new(CountingOracle::default(), &CacheConfig::default());
        let trip = make_trip("T1");

        let first = cached.estimate(&trip, at("2025-06-14T04:03"));
        let second = cached.estimate(&trip, at("2025-06-14T04:03"));

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.entry_count(), 1);
    }

    #[test]
    fn key_includes_instant_and_trip() {
        let cached = CachedOccupancy::new(CountingOracle::default(), &CacheConfig::default());

        cached.estimate(&make_trip("T1"), at("2025-06-14T04:03"));
        cached.estimate(&make_trip("T1"), at("2025-06-15T04:03"));
        cached.estimate(&make_trip("T2"), at("2025-06-14T04:03"));

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let cached = CachedOccupancy::new(CountingOracle::default(), &CacheConfig::default());
        let trip = make_trip("T1");

        cached.estimate(&trip, at("2025-06-14T04:03"));
        cached.invalidate_all();
        cached.estimate(&trip, at("2025-06-14T04:03"));

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }
}
