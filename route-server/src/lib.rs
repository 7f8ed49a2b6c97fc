//! Transit route planner server.
//!
//! A web application that answers: "I'm at this station at this time,
//! which trains get me to my destination?"

pub mod domain;
pub mod interchange;
pub mod network;
pub mod oracle;
pub mod planner;
pub mod timetable;
pub mod web;
