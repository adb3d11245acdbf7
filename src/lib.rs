//! Rooftop photovoltaic generation and payback estimator.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod estimate;
/// Subsidy, payback and savings projection.
pub mod finance;
/// Solar geometry, clear-sky irradiance and transposition onto the panel plane.
pub mod irradiance;
pub mod io;
/// Component catalogs and system construction.
pub mod pv;
pub mod sim;
pub mod site;
pub mod sizing;
/// Hourly weather timeline and external weather sources.
pub mod weather;

pub use error::EstimateError;
pub use estimate::{Estimate, run_estimate};
