//! Timetable sources.
//!
//! The planner never parses files itself; it is handed trips by a
//! [`TimetableSource`]. The JSON file source is what the server binary uses;
//! the in-memory source is for tests and embedding.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{LineId, RegionTag, ScheduledTime, StationName, Stop, Trip, TripId};

use super::LineClassifier;

/// Errors that can occur when loading a timetable.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Reading the file failed
    #[error("failed to read timetable {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid timetable JSON
    #[error("failed to parse timetable {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two trips share an id
    #[error("duplicate trip id: {0}")]
    DuplicateTrip(TripId),
}

/// Anything that can produce the full set of trips.
pub trait TimetableSource {
    /// Load every trip. Called once at start-up.
    fn load_trips(&self) -> Result<Vec<Trip>, SourceError>;
}

/// A source over trips already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    trips: Vec<Trip>,
}

impl InMemorySource {
    /// Create a source that yields `trips`.
    pub fn new(trips: Vec<Trip>) -> Self {
        Self { trips }
    }
}

impl TimetableSource for InMemorySource {
    fn load_trips(&self) -> Result<Vec<Trip>, SourceError> {
        Ok(self.trips.clone())
    }
}

/// One stop as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    /// Raw station name
    pub station: String,
    /// Departure time-of-day, "HH:MM"
    pub time: String,
}

/// One trip as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
    pub name: String,
    /// Line, if the data already names one; otherwise classified
    #[serde(default)]
    pub line: Option<String>,
    /// Region override
    #[serde(default)]
    pub region: Option<String>,
    pub stops: Vec<StopRecord>,
}

impl TripRecord {
    /// Convert to a domain trip.
    ///
    /// Stops whose station name is empty are dropped; stops whose time does not
    /// parse keep their place with no time.
    pub fn into_trip(self, classifier: &LineClassifier) -> Trip {
        let id = TripId::new(self.id);
        let mut stops = Vec::with_capacity(self.stops.len());

        for record in self.stops {
            let station = match StationName::parse(&record.station) {
                Ok(station) => station,
                Err(e) => {
                    warn!(trip = %id, error = %e, "dropping stop with unusable station name");
                    continue;
                }
            };
            match ScheduledTime::parse(&record.time) {
                Ok(time) => stops.push(Stop::new(station, time)),
                Err(e) => {
                    warn!(
                        trip = %id,
                        %station,
                        time = %record.time,
                        error = %e,
                        "stop time unparseable; stop kept without a time"
                    );
                    stops.push(Stop::untimed(station));
                }
            }
        }

        let trip = Trip::new(id, self.name, stops);
        let class = classifier.classify(trip.stops());

        let line = match self.line {
            Some(line) => LineId::new(&line),
            None => class.line,
        };
        let region = match self.region {
            Some(region) => RegionTag::new(&region),
            None => class.region,
        };

        trip.with_line(line)
            .with_direction(class.direction)
            .with_region(region)
    }
}

/// Loads trips from a JSON array of [`TripRecord`]s.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    classifier: LineClassifier,
}

impl JsonFileSource {
    /// Create a source reading `path`, classifying trips with `classifier`.
    pub fn new(path: impl Into<PathBuf>, classifier: LineClassifier) -> Self {
        Self {
            path: path.into(),
            classifier,
        }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse trips from a JSON string.
    pub fn parse_str(&self, json: &str) -> Result<Vec<Trip>, SourceError> {
        let records: Vec<TripRecord> =
            serde_json::from_str(json).map_err(|source| SourceError::Json {
                path: self.path.clone(),
                source,
            })?;

        let mut seen = std::collections::HashSet::new();
        let mut trips = Vec::with_capacity(records.len());
        for record in records {
            let trip = record.into_trip(&self.classifier);
            if !seen.insert(trip.id().clone()) {
                return Err(SourceError::DuplicateTrip(trip.id().clone()));
            }
            trips.push(trip);
        }
        Ok(trips)
    }
}

impl TimetableSource for JsonFileSource {
    fn load_trips(&self) -> Result<Vec<Trip>, SourceError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let trips = self.parse_str(&contents)?;
        debug!(path = %self.path.display(), trips = trips.len(), "timetable loaded");
        Ok(trips)
    }
}
