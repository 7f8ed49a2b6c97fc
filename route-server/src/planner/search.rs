//! Label-setting route search.
//!
//! Finds itineraries from an origin to a destination over the timetable,
//! changing trips only at interchanges that allow it.
//!
//! Labels (station, transfers, arrival, legs so far) are expanded in order of
//! `(arrival, transfers)`. A label is dropped as soon as an equal or earlier
//! arrival is known for the same `(station, transfers)` pair. Labels at the
//! destination are never dropped that way: they become candidate
//! itineraries, so the selector has alternatives to choose from.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::time::Instant;

use chrono::Duration;
use tracing::{debug, trace, warn};

use crate::domain::{Itinerary, Leg, RailTime, StationName};
use crate::interchange::InterchangePolicy;
use crate::oracle::{FareCalculator, OccupancyOracle};
use crate::timetable::{TimetableIndex, TripAt};

use super::config::SearchConfig;
use super::materialize::LegMaterializer;
use super::rank::select_itineraries;

/// Which end of the query a station was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationRole {
    Origin,
    Destination,
}

impl fmt::Display for StationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationRole::Origin => f.write_str("origin"),
            StationRole::Destination => f.write_str("destination"),
        }
    }
}

/// Error from route search.
///
/// Finding no route is not an error: it is an empty [`SearchResult`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Origin and destination are the same station
    #[error("origin and destination are both {0}")]
    SameStation(StationName),

    /// A station no trip calls at
    #[error("unknown {role} station: {station}")]
    UnknownStation {
        role: StationRole,
        station: StationName,
    },

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Search timed out
    #[error("search timed out")]
    Timeout,
}

/// Request for route search.
///
/// Fields left `None` fall back to the planner's [`SearchConfig`].
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Where the traveller starts.
    pub origin: StationName,

    /// Where the traveller wants to be.
    pub destination: StationName,

    /// Earliest boarding instant at the origin.
    pub not_before: RailTime,

    /// Maximum trip changes.
    pub max_transfers: Option<usize>,

    /// Minimum dwell before boarding a different trip.
    pub transfer_dwell: Option<Duration>,

    /// Maximum itineraries to return.
    pub result_count: Option<usize>,

    /// Duration tolerance over the fastest itinerary.
    pub tolerance: Option<Duration>,

    /// Give up with [`SearchError::Timeout`] once this passes.
    pub deadline: Option<Instant>,
}

impl SearchRequest {
    /// Create a new search request using the planner's defaults.
    pub fn new(origin: StationName, destination: StationName, not_before: RailTime) -> Self {
        Self {
            origin,
            destination,
            not_before,
            max_transfers: None,
            transfer_dwell: None,
            result_count: None,
            tolerance: None,
            deadline: None,
        }
    }

    /// Override the maximum number of transfers.
    pub fn with_max_transfers(mut self, max_transfers: usize) -> Self {
        self.max_transfers = Some(max_transfers);
        self
    }

    /// Override the transfer dwell.
    pub fn with_transfer_dwell(mut self, dwell: Duration) -> Self {
        self.transfer_dwell = Some(dwell);
        self
    }

    /// Override the number of itineraries returned.
    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = Some(count);
        self
    }

    /// Override the duration tolerance.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Set a deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Merge the request's overrides into `defaults`.
    pub fn effective_config(&self, defaults: &SearchConfig) -> SearchConfig {
        let mut config = defaults.clone();
        if let Some(n) = self.max_transfers {
            config.max_transfers = n;
        }
        if let Some(d) = self.transfer_dwell {
            config.transfer_dwell_mins = d.num_minutes();
        }
        if let Some(n) = self.result_count {
            config.result_count = n;
        }
        if let Some(t) = self.tolerance {
            config.tolerance_mins = t.num_minutes();
        }
        config
    }

    /// Validate the search request against the timetable.
    pub fn validate(&self, index: &TimetableIndex, config: &SearchConfig) -> Result<(), SearchError> {
        if self.origin == self.destination {
            return Err(SearchError::SameStation(self.origin.clone()));
        }
        if !index.contains_station(&self.origin) {
            return Err(SearchError::UnknownStation {
                role: StationRole::Origin,
                station: self.origin.clone(),
            });
        }
        if !index.contains_station(&self.destination) {
            return Err(SearchError::UnknownStation {
                role: StationRole::Destination,
                station: self.destination.clone(),
            });
        }
        if let Some(field) = config.out_of_range() {
            return Err(SearchError::InvalidRequest(format!("{field} is out of range")));
        }
        if config.result_count == 0 {
            return Err(SearchError::InvalidRequest(
                "result count must be positive".to_string(),
            ));
        }
        if config.transfer_dwell_mins < 0 {
            return Err(SearchError::InvalidRequest(
                "transfer dwell must not be negative".to_string(),
            ));
        }
        if config.tolerance_mins < 0 {
            return Err(SearchError::InvalidRequest(
                "tolerance must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of route search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Selected itineraries, best first. Empty if no route exists.
    pub itineraries: Vec<Itinerary>,

    /// Number of labels expanded during search.
    pub labels_expanded: usize,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            itineraries: Vec::new(),
            labels_expanded: 0,
        }
    }

    /// Returns true if no route was found.
    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }
}

/// Search state: the traveller is at `station` at `arrival`, having made
/// `transfers` changes along `legs`.
#[derive(Debug, Clone)]
struct Label {
    station: StationName,
    arrival: RailTime,
    transfers: usize,
    legs: Vec<Leg>,
}

impl Label {
    fn origin(request: &SearchRequest) -> Self {
        Self {
            station: request.origin.clone(),
            arrival: request.not_before,
            transfers: 0,
            legs: Vec::new(),
        }
    }

    fn first_departure(&self) -> Option<RailTime> {
        self.legs.first().map(Leg::departure_time)
    }

    fn last_leg(&self) -> Option<&Leg> {
        self.legs.last()
    }
}

/// Frontier entry, ordered by (arrival, transfers, legs, insertion order).
#[derive(Debug)]
struct Queued {
    key: (RailTime, usize, usize, u64),
    label: Label,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-priority frontier of labels.
#[derive(Debug, Default)]
struct Frontier {
    heap: BinaryHeap<Reverse<Queued>>,
    next_seq: u64,
}

impl Frontier {
    fn push(&mut self, label: Label) {
        let key = (label.arrival, label.transfers, label.legs.len(), self.next_seq);
        self.next_seq += 1;
        self.heap.push(Reverse(Queued { key, label }));
    }

    fn pop(&mut self) -> Option<Label> {
        self.heap.pop().map(|Reverse(q)| q.label)
    }
}

/// Best known arrival per (station, transfers).
#[derive(Debug, Default)]
struct Dominance {
    best: HashMap<(StationName, usize), RailTime>,
}

impl Dominance {
    /// Record `arrival` unless something at least as early is known.
    /// Returns false if the label is dominated.
    fn admit(&mut self, station: &StationName, transfers: usize, arrival: RailTime) -> bool {
        match self.best.get(&(station.clone(), transfers)) {
            Some(best) if *best <= arrival => false,
            _ => {
                self.best.insert((station.clone(), transfers), arrival);
                true
            }
        }
    }
}

/// Route planner over a loaded timetable.
pub struct Planner<'a> {
    index: &'a TimetableIndex,
    interchanges: &'a InterchangePolicy,
    oracle: &'a dyn OccupancyOracle,
    fares: &'a dyn FareCalculator,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(
        index: &'a TimetableIndex,
        interchanges: &'a InterchangePolicy,
        oracle: &'a dyn OccupancyOracle,
        fares: &'a dyn FareCalculator,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            index,
            interchanges,
            oracle,
            fares,
            config,
        }
    }

    /// Search for itineraries.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        let config = request.effective_config(self.config);
        request.validate(self.index, &config)?;

        let materializer = LegMaterializer::new(self.oracle);
        let mut frontier = Frontier::default();
        let mut dominance = Dominance::default();
        let mut candidates: Vec<Itinerary> = Vec::new();
        let mut labels_expanded = 0;

        let origin = Label::origin(request);
        dominance.admit(&origin.station, 0, origin.arrival);
        frontier.push(origin);

        while let Some(label) = frontier.pop() {
            if request.deadline.is_some_and(|d| Instant::now() >= d) {
                debug!(labels_expanded, candidates = candidates.len(), "search deadline reached");
                return Err(SearchError::Timeout);
            }

            // Every descendant of this label is at least as late with at
            // least as many transfers
            if candidates.len() >= config.result_count {
                let worst = candidates
                    .iter()
                    .map(|c| (c.arrival_time(), c.transfer_count()))
                    .max();
                if worst.is_some_and(|w| (label.arrival, label.transfers) >= w) {
                    break;
                }
            }

            if label.station == request.destination {
                self.promote(label, &mut candidates);
                continue;
            }

            labels_expanded += 1;
            trace!(
                station = %label.station,
                arrival = ?label.arrival,
                transfers = label.transfers,
                legs = label.legs.len(),
                "expanding label"
            );

            for entry in self.index.trips_through(&label.station) {
                self.expand_trip(
                    &label,
                    entry,
                    request,
                    &config,
                    &materializer,
                    &mut dominance,
                    &mut frontier,
                );
            }
        }

        let found = candidates.len();
        let itineraries = select_itineraries(candidates, config.tolerance(), config.result_count)
            .into_iter()
            .map(|it| {
                let fare = self.fares.compute(&it.station_sequence(), it.region());
                it.with_fare(fare)
            })
            .collect::<Vec<_>>();

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            candidates = found,
            itineraries = itineraries.len(),
            labels_expanded,
            "search complete"
        );

        Ok(SearchResult {
            itineraries,
            labels_expanded,
        })
    }

    /// Turn a destination label into a candidate itinerary.
    ///
    /// Candidates sharing (arrival, transfers, departure) collapse to the
    /// one with fewest legs, so the quota counts what the selector returns.
    fn promote(&self, label: Label, candidates: &mut Vec<Itinerary>) {
        let itinerary = match Itinerary::new(label.legs) {
            Ok(itinerary) => itinerary,
            Err(e) => {
                warn!(error = %e, "discarding inconsistent itinerary");
                return;
            }
        };

        let key = |it: &Itinerary| (it.arrival_time(), it.transfer_count(), it.departure_time());
        match candidates.iter().position(|c| key(c) == key(&itinerary)) {
            Some(i) if itinerary.leg_count() < candidates[i].leg_count() => {
                candidates[i] = itinerary;
            }
            Some(_) => {}
            None => candidates.push(itinerary),
        }
    }

    /// Board `entry`'s trip from `label` and push every resulting label.
    #[allow(clippy::too_many_arguments)]
    fn expand_trip(
        &self,
        label: &Label,
        entry: &TripAt,
        request: &SearchRequest,
        config: &SearchConfig,
        materializer: &LegMaterializer<'_>,
        dominance: &mut Dominance,
        frontier: &mut Frontier,
    ) {
        let trip = &entry.trip;

        match trip.stop(entry.stop_idx) {
            Some(stop) if stop.station == label.station => {}
            _ => {
                warn!(
                    trip = %trip.id(),
                    station = %label.station,
                    "index entry does not match trip stops; skipped"
                );
                return;
            }
        }
        if trip.is_last(entry.stop_idx) {
            return;
        }

        let continuing = label.last_leg().is_some_and(|l| l.trip_id() == trip.id());
        if !continuing && label.legs.iter().any(|l| l.trip_id() == trip.id()) {
            return;
        }

        let (floor, transfers) = match label.last_leg() {
            None => (label.arrival, 0),
            Some(_) if continuing => (label.arrival, label.transfers),
            Some(prev) => {
                if label.transfers + 1 > config.max_transfers {
                    return;
                }
                if !self
                    .interchanges
                    .can_transfer(&label.station, prev.trip().line(), trip.line())
                {
                    trace!(
                        station = %label.station,
                        from = %prev.trip().line(),
                        to = %trip.line(),
                        "transfer not allowed"
                    );
                    return;
                }
                let Some(floor) = label.arrival.checked_add(config.transfer_dwell()) else {
                    return;
                };
                (floor, label.transfers + 1)
            }
        };

        let start = label.first_departure();
        for leg in materializer.make_legs(trip, entry.stop_idx, floor, config.time_window()) {
            let departed = start.unwrap_or(leg.departure_time());
            if leg.arrival_time().signed_duration_since(departed) > config.max_journey() {
                // Later stops only arrive later
                break;
            }

            let mut legs = label.legs.clone();
            // Repeats legs the original boarding already pushed; dominance
            // or promotion drops them
            if continuing {
                let Some(last) = legs.pop() else {
                    continue;
                };
                match last.extend_to(leg.alight_idx(), leg.arrival_time()) {
                    Ok(extended) => legs.push(extended),
                    Err(e) => {
                        trace!(trip = %trip.id(), error = %e, "cannot extend leg");
                        continue;
                    }
                }
            } else {
                legs.push(leg.clone());
            }

            let next = Label {
                station: leg.alight_station().clone(),
                arrival: leg.arrival_time(),
                transfers,
                legs,
            };

            if next.station != request.destination
                && !dominance.admit(&next.station, next.transfers, next.arrival)
            {
                continue;
            }
            frontier.push(next);
        }
    }
}
