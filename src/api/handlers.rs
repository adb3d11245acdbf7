//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, HourlyQuery, SummaryResponse};
use crate::config::EstimateConfig;
use crate::estimate::run_estimate;
use crate::finance::ProjectionYear;
use crate::sim::{HourRecord, MonthlyGeneration};
use crate::weather::NoWeather;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String) -> ApiError {
    (status, Json(ErrorResponse { error }))
}

/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        config: state.config.clone(),
        estimate: state.estimate.clone(),
    })
}

/// `GET /monthly` → 200 + twelve `MonthlyGeneration` rows
pub async fn get_monthly(State(state): State<Arc<AppState>>) -> Json<Vec<MonthlyGeneration>> {
    Json(state.estimate.monthly_series())
}

/// Returns hourly records, optionally filtered by timestep range.
///
/// `GET /hourly` → 200 + all 8760 records
/// `GET /hourly?from=N&to=M` → filtered range (inclusive)
/// `GET /hourly?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_hourly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HourlyQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let records: Vec<HourRecord> = state
        .estimate
        .hours
        .iter()
        .filter(|h| h.timestep >= from && h.timestep <= to)
        .copied()
        .collect();

    Ok(Json(records))
}

/// `GET /projection` → 200 + yearly projection rows
pub async fn get_projection(State(state): State<Arc<AppState>>) -> Json<Vec<ProjectionYear>> {
    Json(state.estimate.financial.projection.clone())
}

/// Runs a new estimate for the posted configuration.
///
/// `POST /estimate` → 200 + `SummaryResponse`
/// invalid configuration → 400 + `ErrorResponse`
pub async fn post_estimate(
    Json(config): Json<EstimateConfig>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let cfg = config.clone();
    let result = tokio::task::spawn_blocking(move || run_estimate(&cfg, &NoWeather))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match result {
        Ok(estimate) => Ok(Json(SummaryResponse { config, estimate })),
        Err(e) => Err(api_error(StatusCode::BAD_REQUEST, e.to_string())),
    }
}
