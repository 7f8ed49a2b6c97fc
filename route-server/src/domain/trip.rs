//! Trip types.
//!
//! A `Trip` is one scheduled run of a vehicle: an ordered list of stops, each
//! with a published departure time-of-day. Trips are built once at load time
//! and then shared read-only (behind `Arc`) by every search.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ScheduledTime, StationName};

/// Identifier of a trip, unique within a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Creates a trip id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line (corridor/service) classification, e.g. `bogor`.
///
/// Line ids are lower-cased and trimmed so configuration files and trip data
/// may spell them freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// The line given to trips no classifier rule matched.
    pub const UNKNOWN: &'static str = "unknown";

    /// Creates a line id.
    pub fn new(id: &str) -> Self {
        Self(id.trim().to_lowercase())
    }

    /// The `unknown` line.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// Returns true for the `unknown` line.
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for LineId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| LineId::new(&s))
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operating region a trip belongs to. Fares are computed per region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RegionTag(String);

impl RegionTag {
    /// Creates a region tag.
    pub fn new(tag: &str) -> Self {
        Self(tag.trim().to_lowercase())
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RegionTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| RegionTag::new(&s))
    }
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a stop within a trip's stop sequence.
///
/// ```
/// use route_server::domain::StopIndex;
///
/// let idx = StopIndex(2);
/// assert_eq!(idx.next(), StopIndex(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopIndex(pub usize);

impl StopIndex {
    /// Returns the next index.
    pub fn next(self) -> Self {
        StopIndex(self.0 + 1)
    }
}

impl fmt::Display for StopIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stop on a trip.
///
/// `departure` is `None` when the source time could not be parsed; the stop
/// still occupies its place in the sequence but cannot be boarded or alighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Normalised station
    pub station: StationName,
    /// Published departure time-of-day
    pub departure: Option<ScheduledTime>,
}

impl Stop {
    /// Creates a stop with a known time.
    pub fn new(station: StationName, departure: ScheduledTime) -> Self {
        Self {
            station,
            departure: Some(departure),
        }
    }

    /// Creates a stop whose time is unknown.
    pub fn untimed(station: StationName) -> Self {
        Self {
            station,
            departure: None,
        }
    }
}

/// One scheduled run of a vehicle.
///
/// # Invariants
///
/// - No station appears twice in `stops`. [`Trip::new`] truncates the
///   sequence before the first repeated station.
#[derive(Debug, Clone)]
pub struct Trip {
    id: TripId,
    name: String,
    line: LineId,
    direction: Option<String>,
    region: RegionTag,
    stops: Vec<Stop>,
}

impl Trip {
    /// Region given to trips nobody classified.
    pub const DEFAULT_REGION: &'static str = "default";

    /// Build a trip. The line starts `unknown` and the region `default`;
    /// use the `with_*` methods (or a classifier) to set them.
    pub fn new(id: TripId, name: impl Into<String>, stops: Vec<Stop>) -> Self {
        let stops = truncate_at_repeat(&id, stops);
        Self {
            id,
            name: name.into(),
            line: LineId::unknown(),
            direction: None,
            region: RegionTag::new(Self::DEFAULT_REGION),
            stops,
        }
    }

    /// Sets the line.
    pub fn with_line(mut self, line: LineId) -> Self {
        self.line = line;
        self
    }

    /// Sets the directional tag.
    pub fn with_direction(mut self, direction: Option<String>) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the region.
    pub fn with_region(mut self, region: RegionTag) -> Self {
        self.region = region;
        self
    }

    /// Returns the trip id.
    pub fn id(&self) -> &TripId {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the line classification.
    pub fn line(&self) -> &LineId {
        &self.line
    }

    /// Returns the directional tag, if classified.
    pub fn direction(&self) -> Option<&str> {
        self.direction.as_deref()
    }

    /// Returns the region.
    pub fn region(&self) -> &RegionTag {
        &self.region
    }

    /// Returns the stops in traversal order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Returns the stop at `idx`, if any.
    pub fn stop(&self, idx: StopIndex) -> Option<&Stop> {
        self.stops.get(idx.0)
    }

    /// Finds the position of `station` in this trip.
    pub fn stop_index(&self, station: &StationName) -> Option<StopIndex> {
        self.stops
            .iter()
            .position(|s| &s.station == station)
            .map(StopIndex)
    }

    /// Returns true if `idx` is the final stop (nothing can be reached from it).
    pub fn is_last(&self, idx: StopIndex) -> bool {
        idx.0 + 1 >= self.stops.len()
    }

    /// Stations from `from` to `to`, inclusive.
    ///
    /// Returns an empty slice if the range is out of bounds or reversed.
    pub fn stations_between(&self, from: StopIndex, to: StopIndex) -> Vec<StationName> {
        self.stops
            .get(from.0..=to.0)
            .unwrap_or(&[])
            .iter()
            .map(|s| s.station.clone())
            .collect()
    }

    /// First station, if the trip has any stops.
    pub fn first_station(&self) -> Option<&StationName> {
        self.stops.first().map(|s| &s.station)
    }

    /// Last station, if the trip has any stops.
    pub fn last_station(&self) -> Option<&StationName> {
        self.stops.last().map(|s| &s.station)
    }
}

/// Keep only the prefix of `stops` before the first repeated station.
fn truncate_at_repeat(id: &TripId, mut stops: Vec<Stop>) -> Vec<Stop> {
    let mut seen = HashSet::new();
    if let Some(repeat) = stops.iter().position(|s| !seen.insert(s.station.clone())) {
        warn!(
            trip = %id,
            station = %stops[repeat].station,
            kept = repeat,
            "station repeats within trip; truncating stop sequence"
        );
        stops.truncate(repeat);
    }
    stops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn stop(s: &str, t: &str) -> Stop {
        Stop::new(station(s), ScheduledTime::parse(t).unwrap())
    }

    fn bogor_trip() -> Trip {
        Trip::new(
            TripId::new("T1"),
            "KRL 1001",
            vec![
                stop("Bogor", "04:03"),
                stop("Cilebut", "04:12"),
                stop("Manggarai", "05:06"),
            ],
        )
    }

    #[test]
    fn defaults_before_classification() {
        let trip = bogor_trip();
        assert!(trip.line().is_unknown());
        assert_eq!(trip.region().as_str(), Trip::DEFAULT_REGION);
        assert_eq!(trip.direction(), None);
    }

    #[test]
    fn builder_sets_fields() {
        let trip = bogor_trip()
            .with_line(LineId::new(" Bogor "))
            .with_region(RegionTag::new("Jabodetabek"))
            .with_direction(Some("bogor-manggarai".into()));
        assert_eq!(trip.line().as_str(), "bogor");
        assert_eq!(trip.region().as_str(), "jabodetabek");
        assert_eq!(trip.direction(), Some("bogor-manggarai"));
    }

    #[test]
    fn stop_index_lookup() {
        let trip = bogor_trip();
        assert_eq!(trip.stop_index(&station("cilebut")), Some(StopIndex(1)));
        assert_eq!(trip.stop_index(&station("Depok")), None);
    }

    #[test]
    fn is_last() {
        let trip = bogor_trip();
        assert!(!trip.is_last(StopIndex(0)));
        assert!(!trip.is_last(StopIndex(1)));
        assert!(trip.is_last(StopIndex(2)));
    }

    #[test]
    fn truncates_at_first_repeat() {
        let trip = Trip::new(
            TripId::new("LOOP"),
            "Loop",
            vec![
                stop("Jakarta Kota", "10:00"),
                stop("Kampung Bandan", "10:05"),
                stop("Ancol", "10:15"),
                stop("Kampung Bandan", "10:25"),
                stop("Jakarta Kota", "10:30"),
            ],
        );
        assert_eq!(trip.stops().len(), 3);
        assert_eq!(trip.last_station(), Some(&station("Ancol")));
    }

    #[test]
    fn stations_between_inclusive() {
        let trip = bogor_trip();
        let names: Vec<_> = trip
            .stations_between(StopIndex(0), StopIndex(2))
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["bogor", "cilebut", "manggarai"]);
        assert!(trip.stations_between(StopIndex(2), StopIndex(5)).is_empty());
    }

    #[test]
    fn ids_deserialize() {
        let line: LineId = serde_json::from_str("\" Cikarang \"").unwrap();
        assert_eq!(line, LineId::new("cikarang"));
        let trip: TripId = serde_json::from_str("\"T9\"").unwrap();
        assert_eq!(trip.as_str(), "T9");
    }
}
