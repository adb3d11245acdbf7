//! REST API over a completed estimate.
//!
//! Read-only endpoints serve the estimate computed at startup:
//! - `/summary` for the configuration, system, generation and financials
//! - `/monthly` for the twelve monthly totals
//! - `/hourly` for hourly records with optional range filtering
//! - `/projection` for the multi-year savings table
//!
//! `POST /estimate` runs a fresh estimate for a JSON configuration using
//! fallback weather.

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use log::info;

use crate::config::EstimateConfig;
use crate::estimate::Estimate;

pub use types::{ErrorResponse, HourlyQuery, SummaryResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the startup estimate completes and wrapped in
/// `Arc`; handlers only read it.
pub struct AppState {
    /// Configuration the estimate was run with.
    pub config: EstimateConfig,
    pub estimate: Estimate,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/monthly", get(handlers::get_monthly))
        .route("/hourly", get(handlers::get_hourly))
        .route("/projection", get(handlers::get_projection))
        .route("/estimate", post(handlers::post_estimate))
        .with_state(state)
}

/// Binds to the given address and serves the API until shutdown.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
