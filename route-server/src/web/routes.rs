//! HTTP route handlers.

use std::time::Instant;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::planner::{Planner, SearchError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/route/search", post(search_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every station in the timetable, sorted.
async fn list_stations(State(state): State<AppState>) -> Json<StationsResponse> {
    let stations = state
        .index
        .stations()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    Json(StationsResponse { stations })
}

/// Search for routes between two stations.
async fn search_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchRouteResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: SearchRouteRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "unparseable search body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;
    let request = req
        .to_search_request()?
        .with_deadline(Instant::now() + state.search_timeout);

    // The search is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        let planner = Planner::new(
            &state.index,
            &state.interchanges,
            state.occupancy.as_ref(),
            state.fares.as_ref(),
            &state.config,
        );
        planner.search(&request)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("search task failed: {e}"),
    })??;

    Ok(Json(SearchRouteResponse::from_result(&result)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<InvalidField> for AppError {
    fn from(e: InvalidField) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::SameStation(_) | SearchError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            SearchError::UnknownStation { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            SearchError::Timeout => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
