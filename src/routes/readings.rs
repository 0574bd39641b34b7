//! Structured JSON endpoints over the query engine.
//!
//! - `GET /readings/latest`
//! - `GET /readings/daily/{mode}?date=YYYY-MM-DD` (mean, max or min)
//! - `GET /readings/chart?date=YYYY-MM-DD`

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::aggregate::{ChartStats, Mode, StatisticSet};
use crate::error::{QueryError, Result};
use crate::format;
use crate::models::Reading;
use crate::query::QueryService;
use crate::select::parse_date;

// ---

pub fn router() -> Router<QueryService> {
    // ---
    Router::new()
        .route("/readings/latest", get(latest))
        .route("/readings/daily/{mode}", get(daily))
        .route("/readings/chart", get(chart))
}

/// Query parameters for date-scoped endpoints.
#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<String>,
}

impl DateQuery {
    /// Validate the `date` parameter before the source is touched.
    fn parse(&self) -> Result<NaiveDate> {
        // ---
        let date = self
            .date
            .as_deref()
            .ok_or_else(|| QueryError::usage("Missing query parameter: date=YYYY-MM-DD"))?;
        parse_date(date)
    }
}

#[derive(Debug, Serialize)]
struct DailyResponse {
    date: NaiveDate,
    mode: Mode,
    label: String,
    stats: StatisticSet,
}

async fn latest(State(service): State<QueryService>) -> Result<Json<Reading>> {
    // ---
    let span = tracing::info_span!("query", request_id = %Uuid::new_v4(), mode = "latest");
    async move {
        let reading = service.latest().await?;
        info!("GET /readings/latest - {}", reading.timestamp);
        Ok(Json(reading))
    }
    .instrument(span)
    .await
}

async fn daily(
    Path(mode): Path<String>,
    Query(params): Query<DateQuery>,
    State(service): State<QueryService>,
) -> Result<Json<DailyResponse>> {
    // ---
    let mode: Mode = mode.parse()?;
    if mode == Mode::Latest {
        return Err(QueryError::usage(
            "latest takes no date. Use: GET /readings/latest",
        ));
    }
    let date = params.parse()?;

    let span = tracing::info_span!("query", request_id = %Uuid::new_v4(), %mode, %date);
    async move {
        let stats = service.daily(mode, date).await?;
        info!("GET /readings/daily/{} - OK", mode);
        Ok(Json(DailyResponse {
            date,
            mode,
            label: format::daily_label(mode, date),
            stats,
        }))
    }
    .instrument(span)
    .await
}

async fn chart(
    Query(params): Query<DateQuery>,
    State(service): State<QueryService>,
) -> Result<Json<ChartStats>> {
    // ---
    let date = params.parse()?;

    let span = tracing::info_span!("query", request_id = %Uuid::new_v4(), mode = "chart", %date);
    async move {
        let stats = service.chart(date).await?;
        info!("GET /readings/chart - OK");
        Ok(Json(stats))
    }
    .instrument(span)
    .await
}
