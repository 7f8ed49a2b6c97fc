//! Journey planner using label-setting search.
//!
//! This module answers: "I'm at this station at this time - how do I reach
//! my destination?"
//!
//! The search expands time-ordered labels over the timetable, boarding
//! trips through the [`LegMaterializer`] and changing trips only where the
//! interchange policy allows. Candidates are narrowed to a handful of
//! alternatives by [`select_itineraries`].

mod config;
mod materialize;
mod rank;
mod search;


pub use config::SearchConfig;
pub use materialize::LegMaterializer;
pub use rank::{deduplicate, rank_itineraries, select_itineraries};
pub use search::{Planner, SearchError, SearchRequest, SearchResult, StationRole};
