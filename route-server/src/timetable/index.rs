//! Station-to-trip index.
//!
//! The search repeatedly asks "which trips call at station X, and where in
//! their stop list?". The index answers that with one hash lookup, built once
//! when the timetable is loaded and shared read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::{StationName, StopIndex, Trip};

/// A trip calling at an indexed station.
#[derive(Debug, Clone)]
pub struct TripAt {
    /// The calling trip.
    pub trip: Arc<Trip>,
    /// Where the station sits in the trip's stop list.
    pub stop_idx: StopIndex,
}

/// Immutable index from station to the trips that call there.
///
/// Entries for a station appear in the order the trips were loaded, so the
/// search expands them deterministically.
#[derive(Debug, Default)]
pub struct TimetableIndex {
    trips: Vec<Arc<Trip>>,
    by_station: HashMap<StationName, Vec<TripAt>>,
}

impl TimetableIndex {
    /// Build the index from loaded trips.
    ///
    /// Trips are expected to have passed [`Trip::new`], so a station appears
    /// at most once per trip.
    pub fn from_trips(trips: Vec<Arc<Trip>>) -> Self {
        let mut by_station: HashMap<StationName, Vec<TripAt>> = HashMap::new();

        for trip in &trips {
            for (idx, stop) in trip.stops().iter().enumerate() {
                by_station
                    .entry(stop.station.clone())
                    .or_default()
                    .push(TripAt {
                        trip: trip.clone(),
                        stop_idx: StopIndex(idx),
                    });
            }
        }

        debug!(
            trips = trips.len(),
            stations = by_station.len(),
            "timetable index built"
        );

        Self { trips, by_station }
    }

    /// Trips calling at `station`; empty if the station is unknown.
    pub fn trips_through(&self, station: &StationName) -> &[TripAt] {
        self.by_station
            .get(station)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if any trip calls at `station`.
    pub fn contains_station(&self, station: &StationName) -> bool {
        self.by_station.contains_key(station)
    }

    /// All indexed stations, sorted by name.
    pub fn stations(&self) -> Vec<&StationName> {
        let mut stations: Vec<_> = self.by_station.keys().collect();
        stations.sort();
        stations
    }

    /// Returns every loaded trip.
    pub fn trips(&self) -> &[Arc<Trip>] {
        &self.trips
    }

    /// Number of loaded trips.
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    /// Number of distinct stations.
    pub fn station_count(&self) -> usize {
        self.by_station.len()
    }
}
