//! Scoring collaborators consulted by the planner: occupancy and fares.

mod cache;
mod fare;
mod occupancy;

pub use cache::{CacheConfig, CachedOccupancy};
pub use fare::{DistanceEntry, DistanceFareTable, FareCalculator, FareConfig, FareRule, RegionFare};
pub use occupancy::{CurveOccupancy, DemandPeriod, NoOccupancy, OccupancyOracle};
