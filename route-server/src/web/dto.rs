//! Data transfer objects for web requests and responses.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, Leg, RailTime, StationName};
use crate::planner::{SearchRequest, SearchResult};

/// Request to search for routes.
#[derive(Debug, Deserialize)]
pub struct SearchRouteRequest {
    /// Origin station name
    pub origin: String,

    /// Destination station name
    pub destination: String,

    /// Earliest departure, `YYYY-MM-DDTHH:MM`
    pub not_before: String,

    /// Maximum trip changes
    pub max_transfers: Option<usize>,

    /// Minimum dwell at an interchange (minutes)
    pub transfer_dwell_mins: Option<i64>,

    /// Maximum itineraries to return
    pub result_count: Option<usize>,

    /// How much slower than the fastest an alternative may be (minutes)
    pub tolerance_mins: Option<i64>,
}

/// A request field that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct InvalidField {
    pub field: &'static str,
    pub message: String,
}

impl SearchRouteRequest {
    /// Parse into a planner request.
    pub fn to_search_request(&self) -> Result<SearchRequest, InvalidField> {
        let origin = StationName::parse(&self.origin).map_err(|e| InvalidField {
            field: "origin",
            message: e.to_string(),
        })?;
        let destination = StationName::parse(&self.destination).map_err(|e| InvalidField {
            field: "destination",
            message: e.to_string(),
        })?;
        let not_before = RailTime::parse_iso(&self.not_before).map_err(|e| InvalidField {
            field: "not_before",
            message: e.to_string(),
        })?;

        let mut request = SearchRequest::new(origin, destination, not_before);
        if let Some(n) = self.max_transfers {
            request = request.with_max_transfers(n);
        }
        if let Some(mins) = self.transfer_dwell_mins {
            request = request.with_transfer_dwell(minutes("transfer_dwell_mins", mins)?);
        }
        if let Some(n) = self.result_count {
            request = request.with_result_count(n);
        }
        if let Some(mins) = self.tolerance_mins {
            request = request.with_tolerance(minutes("tolerance_mins", mins)?);
        }
        Ok(request)
    }
}

fn minutes(field: &'static str, mins: i64) -> Result<Duration, InvalidField> {
    Duration::try_minutes(mins).ok_or_else(|| InvalidField {
        field,
        message: format!("{mins} minutes is out of range"),
    })
}

/// Response for route search.
#[derive(Debug, Serialize)]
pub struct SearchRouteResponse {
    /// Itineraries, best first
    pub itineraries: Vec<ItineraryResult>,

    /// Labels expanded during search
    pub labels_expanded: usize,
}

impl SearchRouteResponse {
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            itineraries: result
                .itineraries
                .iter()
                .map(ItineraryResult::from_itinerary)
                .collect(),
            labels_expanded: result.labels_expanded,
        }
    }
}

/// An itinerary option.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    /// Legs in travel order
    pub legs: Vec<LegResult>,

    /// Departure from origin (HH:MM)
    pub departure: String,

    /// Arrival at destination (HH:MM)
    pub arrival: String,

    /// Total duration in minutes
    pub duration_mins: i64,

    /// Number of changes
    pub transfers: usize,

    /// Fare, if one was computed
    pub fare: Option<u32>,
}

impl ItineraryResult {
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            legs: itinerary.legs().iter().map(LegResult::from_leg).collect(),
            departure: itinerary.departure_time().to_string(),
            arrival: itinerary.arrival_time().to_string(),
            duration_mins: itinerary.total_duration().num_minutes(),
            transfers: itinerary.transfer_count(),
            fare: itinerary.fare(),
        }
    }
}

/// A ride on one trip.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub trip_id: String,
    pub trip_name: String,
    pub line: String,
    pub board_station: String,
    pub alight_station: String,

    /// Boarding time (HH:MM)
    pub departure: String,

    /// Alighting time (HH:MM)
    pub arrival: String,

    /// Boarding instant, `YYYY-MM-DDTHH:MM`
    pub departure_at: String,

    /// Alighting instant, `YYYY-MM-DDTHH:MM`
    pub arrival_at: String,

    /// Load percentage, -1 if unknown
    pub occupancy: i32,
}

impl LegResult {
    pub fn from_leg(leg: &Leg) -> Self {
        Self {
            trip_id: leg.trip_id().to_string(),
            trip_name: leg.trip().name().to_string(),
            line: leg.trip().line().to_string(),
            board_station: leg.board_station().to_string(),
            alight_station: leg.alight_station().to_string(),
            departure: leg.departure_time().to_string(),
            arrival: leg.arrival_time().to_string(),
            departure_at: leg.departure_time().to_iso(),
            arrival_at: leg.arrival_time().to_iso(),
            occupancy: leg.occupancy().value(),
        }
    }
}

/// Response listing known stations.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
