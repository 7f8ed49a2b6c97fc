//! Web layer for the route planner.
//!
//! Provides a JSON API for listing stations and searching routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, DEFAULT_SEARCH_TIMEOUT};
