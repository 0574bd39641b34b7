use axum::{http::StatusCode, response::IntoResponse, response::Response, Json, Router};
use serde::Serialize;

use crate::error::QueryError;
use crate::format;
use crate::query::QueryService;

mod command;
mod health;
mod readings;

// ---

pub fn router(service: QueryService) -> Router {
    // ---
    Router::new()
        .merge(readings::router())
        .merge(command::router())
        .merge(health::router())
        .with_state(service)
}

/// JSON body for failed requests.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        // ---
        let status = match &self {
            QueryError::Usage(_) => StatusCode::BAD_REQUEST,
            QueryError::NoDataAvailable | QueryError::NoDataForDate(_) => StatusCode::NOT_FOUND,
            QueryError::Internal(_) | QueryError::Unexpected(_) => {
                tracing::error!("Query failed: {:#}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: format::error_text(&self),
        };
        (status, Json(body)).into_response()
    }
}
