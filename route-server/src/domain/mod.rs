//! Domain types for the route planner.
//!
//! This module contains the core domain model types that represent
//! validated timetable data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod error;
mod itinerary;
mod leg;
mod occupancy;
mod station;
mod time;
mod trip;

pub use error::DomainError;
pub use itinerary::Itinerary;
pub use leg::Leg;
pub use occupancy::Occupancy;
pub use station::{InvalidStationName, StationName};
pub use time::{RailTime, ScheduledTime, TimeError};
pub use trip::{LineId, RegionTag, Stop, StopIndex, Trip, TripId};
