//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use crate::interchange::InterchangePolicy;
use crate::oracle::{FareCalculator, OccupancyOracle};
use crate::planner::SearchConfig;
use crate::timetable::TimetableIndex;

/// How long a single search may run before giving up.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state.
///
/// Everything is read-only after start-up, so searches share it freely.
#[derive(Clone)]
pub struct AppState {
    /// Indexed timetable
    pub index: Arc<TimetableIndex>,

    /// Where trips may be changed
    pub interchanges: Arc<InterchangePolicy>,

    /// Occupancy estimates for legs
    pub occupancy: Arc<dyn OccupancyOracle>,

    /// Fares for selected itineraries
    pub fares: Arc<dyn FareCalculator>,

    /// Route planner configuration
    pub config: Arc<SearchConfig>,

    /// Per-search deadline
    pub search_timeout: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        index: TimetableIndex,
        interchanges: InterchangePolicy,
        occupancy: impl OccupancyOracle + 'static,
        fares: impl FareCalculator + 'static,
        config: SearchConfig,
    ) -> Self {
        Self {
            index: Arc::new(index),
            interchanges: Arc::new(interchanges),
            occupancy: Arc::new(occupancy),
            fares: Arc::new(fares),
            config: Arc::new(config),
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }

    /// Override the per-search deadline.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }
}
