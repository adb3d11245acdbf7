//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::config::EstimateConfig;
use crate::estimate::Estimate;

/// Configuration together with the estimate it produced.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub config: EstimateConfig,
    pub estimate: Estimate,
}

/// Inclusive timestep range for `/hourly`.
#[derive(Debug, Deserialize)]
pub struct HourlyQuery {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

/// JSON error body for 4xx and 5xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
