//! Ride leg type.
//!
//! A `Leg` is one continuous ride on a single trip from a boarding stop to a
//! later alighting stop. It holds an `Arc<Trip>` so cloning partial
//! itineraries during search stays cheap.

use std::sync::Arc;

use chrono::Duration;

use super::{DomainError, Occupancy, RailTime, StationName, StopIndex, Trip, TripId};

/// A leg of an itinerary (one trip).
///
/// Times are resolved instants, not published times-of-day: the leg knows
/// which calendar day it runs on.
///
/// # Invariants
///
/// - `alight_idx > board_idx` (must travel forward on the trip)
/// - Both indices are valid for the trip's stops
/// - `arrival > departure`
#[derive(Debug, Clone)]
pub struct Leg {
    trip: Arc<Trip>,
    board_idx: StopIndex,
    alight_idx: StopIndex,
    departure: RailTime,
    arrival: RailTime,
    occupancy: Occupancy,
}

impl Leg {
    /// Construct a leg, validating indices and times.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `alight_idx <= board_idx` (must travel forward)
    /// - Either index is out of bounds
    /// - `arrival` is not strictly after `departure`
    ///
    /// # Examples
    ///
    /// ```
    /// use route_server::domain::{Leg, Occupancy, RailTime, ScheduledTime, StationName, Stop, StopIndex, Trip, TripId};
    /// use std::sync::Arc;
    ///
    /// let stop = |s: &str, t: &str| {
    ///     Stop::new(StationName::parse(s).unwrap(), ScheduledTime::parse(t).unwrap())
    /// };
    /// let trip = Arc::new(Trip::new(
    ///     TripId::new("T1"),
    ///     "KRL 1001",
    ///     vec![stop("Bogor", "04:03"), stop("Manggarai", "05:06")],
    /// ));
    ///
    /// let leg = Leg::new(
    ///     trip,
    ///     StopIndex(0),
    ///     StopIndex(1),
    ///     RailTime::parse_iso("2025-06-14T04:03").unwrap(),
    ///     RailTime::parse_iso("2025-06-14T05:06").unwrap(),
    ///     Occupancy::Unknown,
    /// )
    /// .unwrap();
    /// assert_eq!(leg.board_station().as_str(), "bogor");
    /// assert_eq!(leg.duration().num_minutes(), 63);
    /// ```
    pub fn new(
        trip: Arc<Trip>,
        board_idx: StopIndex,
        alight_idx: StopIndex,
        departure: RailTime,
        arrival: RailTime,
        occupancy: Occupancy,
    ) -> Result<Self, DomainError> {
        if alight_idx <= board_idx {
            return Err(DomainError::InvalidLeg(
                "alight index must be after board index",
            ));
        }
        if trip.stop(alight_idx).is_none() {
            return Err(DomainError::InvalidStopIndex);
        }
        if arrival <= departure {
            return Err(DomainError::InvalidLeg("arrival must be after departure"));
        }

        Ok(Leg {
            trip,
            board_idx,
            alight_idx,
            departure,
            arrival,
            occupancy,
        })
    }

    /// Ride further on the same trip: same boarding, later alighting.
    ///
    /// Occupancy is kept from the original boarding.
    pub fn extend_to(&self, alight_idx: StopIndex, arrival: RailTime) -> Result<Self, DomainError> {
        Leg::new(
            self.trip.clone(),
            self.board_idx,
            alight_idx,
            self.departure,
            arrival,
            self.occupancy,
        )
    }

    /// Returns the trip this leg rides.
    pub fn trip(&self) -> &Arc<Trip> {
        &self.trip
    }

    /// Returns the trip id.
    pub fn trip_id(&self) -> &TripId {
        self.trip.id()
    }

    /// Returns the boarding stop index.
    pub fn board_idx(&self) -> StopIndex {
        self.board_idx
    }

    /// Returns the alighting stop index.
    pub fn alight_idx(&self) -> StopIndex {
        self.alight_idx
    }

    /// Returns the boarding station.
    pub fn board_station(&self) -> &StationName {
        // Safe: validated at construction
        &self.trip.stops()[self.board_idx.0].station
    }

    /// Returns the alighting station.
    pub fn alight_station(&self) -> &StationName {
        &self.trip.stops()[self.alight_idx.0].station
    }

    /// Returns the resolved boarding instant.
    pub fn departure_time(&self) -> RailTime {
        self.departure
    }

    /// Returns the resolved alighting instant.
    pub fn arrival_time(&self) -> RailTime {
        self.arrival
    }

    /// Returns the occupancy estimate at boarding.
    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Returns the ride duration.
    pub fn duration(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }

    /// Returns the number of intermediate stops (excluding board and alight).
    pub fn intermediate_stop_count(&self) -> usize {
        self.alight_idx.0 - self.board_idx.0 - 1
    }

    /// Stations passed on this leg, boarding and alighting inclusive.
    pub fn stations(&self) -> Vec<StationName> {
        self.trip.stations_between(self.board_idx, self.alight_idx)
    }
}

impl PartialEq for Leg {
    fn eq(&self, other: &Self) -> bool {
        self.trip.id() == other.trip.id()
            && self.board_idx == other.board_idx
            && self.alight_idx == other.alight_idx
            && self.departure == other.departure
    }
}

impl Eq for Leg {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScheduledTime, Stop};

    fn at(s: &str) -> RailTime {
        RailTime::parse_iso(s).unwrap()
    }

    fn make_trip() -> Arc<Trip> {
        let stop = |s: &str, t: &str| {
            Stop::new(StationName::parse(s).unwrap(), ScheduledTime::parse(t).unwrap())
        };
        Arc::new(Trip::new(
            TripId::new("T1"),
            "KRL 1001",
            vec![
                stop("Bogor", "04:03"),
                stop("Cilebut", "04:12"),
                stop("Bojong Gede", "04:18"),
                stop("Manggarai", "05:06"),
            ],
        ))
    }

    #[test]
    fn leg_construction_valid() {
        let leg = Leg::new(
            make_trip(),
            StopIndex(0),
            StopIndex(3),
            at("2025-06-14T04:03"),
            at("2025-06-14T05:06"),
            Occupancy::percent(40),
        )
        .unwrap();

        assert_eq!(leg.trip_id().as_str(), "T1");
        assert_eq!(leg.board_station().as_str(), "bogor");
        assert_eq!(leg.alight_station().as_str(), "manggarai");
        assert_eq!(leg.duration(), Duration::minutes(63));
        assert_eq!(leg.intermediate_stop_count(), 2);
        assert_eq!(leg.stations().len(), 4);
        assert_eq!(leg.occupancy(), Occupancy::percent(40));
    }

    #[test]
    fn leg_rejects_backwards() {
        let result = Leg::new(
            make_trip(),
            StopIndex(2),
            StopIndex(1),
            at("2025-06-14T04:18"),
            at("2025-06-14T04:30"),
            Occupancy::Unknown,
        );
        assert!(matches!(result, Err(DomainError::InvalidLeg(_))));
    }

    #[test]
    fn leg_rejects_out_of_bounds() {
        let result = Leg::new(
            make_trip(),
            StopIndex(0),
            StopIndex(9),
            at("2025-06-14T04:03"),
            at("2025-06-14T05:06"),
            Occupancy::Unknown,
        );
        assert_eq!(result.unwrap_err(), DomainError::InvalidStopIndex);
    }

    #[test]
    fn leg_rejects_zero_duration() {
        let result = Leg::new(
            make_trip(),
            StopIndex(0),
            StopIndex(1),
            at("2025-06-14T04:03"),
            at("2025-06-14T04:03"),
            Occupancy::Unknown,
        );
        assert!(matches!(result, Err(DomainError::InvalidLeg(_))));
    }

    #[test]
    fn extend_keeps_boarding() {
        let leg = Leg::new(
            make_trip(),
            StopIndex(0),
            StopIndex(1),
            at("2025-06-14T04:03"),
            at("2025-06-14T04:12"),
            Occupancy::percent(20),
        )
        .unwrap();

        let longer = leg.extend_to(StopIndex(3), at("2025-06-14T05:06")).unwrap();
        assert_eq!(longer.board_idx(), StopIndex(0));
        assert_eq!(longer.departure_time(), leg.departure_time());
        assert_eq!(longer.alight_station().as_str(), "manggarai");
        assert_eq!(longer.occupancy(), Occupancy::percent(20));
        assert_ne!(longer, leg);
    }
}
