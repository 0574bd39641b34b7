// src/routes/health.rs
//! Health check endpoint for the air-quality query service.
//!
//! This module defines the `/health` route used by container orchestrators
//! and CI pipelines to verify that the service is running and able to respond
//! to HTTP requests. It is a sibling module in the `routes` directory:
//! - Internal to this file: endpoint handler and its response type
//! - Exports to the gateway (`mod.rs`): a subrouter containing the `/health` route

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::query::QueryService;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    source: &'static str,
}

/// Handle `GET /health`.
///
/// Reports which kind of row source is configured. The source itself is not
/// contacted, so a slow or unreachable sheet does not fail the check.
async fn health(State(service): State<QueryService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        source: service.source_kind(),
    })
}

/// Create a subrouter containing the `/health` route.
pub fn router() -> Router<QueryService> {
    Router::new().route("/health", get(health))
}
