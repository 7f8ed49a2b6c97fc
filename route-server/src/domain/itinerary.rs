//! Itinerary type.
//!
//! An `Itinerary` is a complete journey from origin to destination: one or
//! more legs, joined at stations where the traveller changes trips.

use chrono::Duration;

use super::{DomainError, Leg, RailTime, RegionTag, StationName};

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (alighting station of one = boarding station of next)
/// - No leg boards before the previous leg arrives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    legs: Vec<Leg>,
    fare: Option<u32>,
}

impl Itinerary {
    /// Constructs an itinerary from legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `legs` is empty
    /// - Legs don't connect
    /// - A leg departs before its predecessor arrives
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for pair in legs.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.alight_station() != next.board_station() {
                return Err(DomainError::StationsNotConnected(
                    prev.alight_station().clone(),
                    next.board_station().clone(),
                ));
            }
            if next.departure_time() < prev.arrival_time() {
                return Err(DomainError::LegsOverlap(next.board_station().clone()));
            }
        }

        Ok(Itinerary { legs, fare: None })
    }

    /// Attaches a fare in integer currency units.
    pub fn with_fare(mut self, fare: u32) -> Self {
        self.fare = Some(fare);
        self
    }

    /// Returns the legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the first leg.
    pub fn first_leg(&self) -> &Leg {
        // Safe: non-empty by construction
        &self.legs[0]
    }

    /// Returns the last leg.
    pub fn last_leg(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    /// Returns the origin station.
    pub fn origin(&self) -> &StationName {
        self.first_leg().board_station()
    }

    /// Returns the destination station.
    pub fn destination(&self) -> &StationName {
        self.last_leg().alight_station()
    }

    /// Returns the first boarding instant.
    pub fn departure_time(&self) -> RailTime {
        self.first_leg().departure_time()
    }

    /// Returns the final alighting instant.
    pub fn arrival_time(&self) -> RailTime {
        self.last_leg().arrival_time()
    }

    /// Last alighting minus first boarding.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    /// Number of adjacent leg pairs on different trips.
    pub fn transfer_count(&self) -> usize {
        self.legs
            .windows(2)
            .filter(|pair| pair[0].trip_id() != pair[1].trip_id())
            .count()
    }

    /// Returns the number of legs.
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Returns true if there are no transfers.
    pub fn is_direct(&self) -> bool {
        self.transfer_count() == 0
    }

    /// Every station passed, in order, with each interchange listed once.
    pub fn station_sequence(&self) -> Vec<StationName> {
        let mut stations: Vec<StationName> = Vec::new();
        for leg in &self.legs {
            for station in leg.stations() {
                if stations.last() != Some(&station) {
                    stations.push(station);
                }
            }
        }
        stations
    }

    /// Region of the first trip, used for fare lookup.
    pub fn region(&self) -> &RegionTag {
        self.first_leg().trip().region()
    }

    /// Returns the attached fare, if computed.
    pub fn fare(&self) -> Option<u32> {
        self.fare
    }
}
