//! Search configuration for the route planner.

use chrono::Duration;

/// Configuration parameters for route search.
///
/// These are server-wide defaults; a [`SearchRequest`](super::SearchRequest)
/// may override the per-query ones.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of trip changes allowed.
    pub max_transfers: usize,

    /// Minimum dwell at an interchange before boarding a different trip
    /// (minutes).
    pub transfer_dwell_mins: i64,

    /// Maximum number of itineraries to return.
    pub result_count: usize,

    /// How much longer than the fastest itinerary an alternative may take
    /// and still be shown (minutes).
    pub tolerance_mins: i64,

    /// How long after the earliest possible boarding a departure is still
    /// considered (minutes).
    pub time_window_mins: i64,

    /// Maximum total journey time (minutes).
    /// Itineraries longer than this are pruned during search.
    pub max_journey_mins: i64,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_transfers: usize,
        transfer_dwell_mins: i64,
        result_count: usize,
        tolerance_mins: i64,
        time_window_mins: i64,
        max_journey_mins: i64,
    ) -> Self {
        Self {
            max_transfers,
            transfer_dwell_mins,
            result_count,
            tolerance_mins,
            time_window_mins,
            max_journey_mins,
        }
    }

    /// Returns the transfer dwell as a Duration.
    pub fn transfer_dwell(&self) -> Duration {
        Duration::minutes(self.transfer_dwell_mins)
    }

    /// Returns the tolerance window as a Duration.
    pub fn tolerance(&self) -> Duration {
        Duration::minutes(self.tolerance_mins)
    }

    /// Returns the time window as a Duration.
    pub fn time_window(&self) -> Duration {
        Duration::minutes(self.time_window_mins)
    }

    /// Returns the maximum journey time as a Duration.
    pub fn max_journey(&self) -> Duration {
        Duration::minutes(self.max_journey_mins)
    }

    /// The first duration field too large for a [`Duration`], if any.
    ///
    /// The plain accessors panic on such values; check this first.
    pub fn out_of_range(&self) -> Option<&'static str> {
        [
            ("transfer dwell", self.transfer_dwell_mins),
            ("tolerance", self.tolerance_mins),
            ("time window", self.time_window_mins),
            ("max journey", self.max_journey_mins),
        ]
        .into_iter()
        .find(|(_, mins)| Duration::try_minutes(*mins).is_none())
        .map(|(name, _)| name)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_transfers: 2,
            transfer_dwell_mins: 15,
            result_count: 3,
            tolerance_mins: 30,
            time_window_mins: 120, // 2 hours
            max_journey_mins: 360, // 6 hours
        }
    }
}
