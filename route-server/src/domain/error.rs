//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. The search engine treats them as "skip this
//! candidate", never as a reason to abort a query.

use super::{StationName, StopIndex, TripId};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A stop used for boarding or alighting has no usable time
    #[error("trip {trip} has no usable time at stop {index}")]
    MissingTime { trip: TripId, index: StopIndex },

    /// Stop index is out of bounds for the trip
    #[error("invalid stop index: out of bounds")]
    InvalidStopIndex,

    /// Invalid leg construction (e.g., alight before board)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs don't share a station
    #[error("legs do not connect: {0} then {1}")]
    StationsNotConnected(StationName, StationName),

    /// A leg departs before the previous one arrives
    #[error("leg boarding at {0} departs before the previous leg arrives")]
    LegsOverlap(StationName),

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::MissingTime {
            trip: TripId::new("T1"),
            index: StopIndex(2),
        };
        assert_eq!(err.to_string(), "trip T1 has no usable time at stop 2");

        let err = DomainError::InvalidStopIndex;
        assert_eq!(err.to_string(), "invalid stop index: out of bounds");

        let err = DomainError::InvalidLeg("alight must be after board");
        assert_eq!(err.to_string(), "invalid leg: alight must be after board");

        let from = StationName::parse("Manggarai").unwrap();
        let to = StationName::parse("Duri").unwrap();
        let err = DomainError::StationsNotConnected(from, to);
        assert_eq!(err.to_string(), "legs do not connect: manggarai then duri");

        let err = DomainError::EmptyItinerary;
        assert_eq!(err.to_string(), "itinerary must have at least one leg");
    }
}
