//! Timetable loading, classification and indexing.

mod classify;
mod index;
mod source;

pub use classify::{Classification, ClassifierConfig, ClassifierRule, LineClassifier, RegionRule};
pub use index::{TimetableIndex, TripAt};
pub use source::{
    InMemorySource, JsonFileSource, SourceError, StopRecord, TimetableSource, TripRecord,
};
