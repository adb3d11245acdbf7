//! Per-hour simulation records.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::weather::WeatherCoverage;

/// Complete record of one simulated hour.
///
/// `ac_real_w` is the weather-driven output after system losses;
/// `ac_clear_w` is the clear-sky baseline at reference conditions with no
/// losses applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourRecord {
    /// Hour index within the year (0-based).
    pub timestep: usize,
    /// Start of the hour in site-local time.
    pub local_time: NaiveDateTime,
    pub solar_elevation_deg: f64,
    pub ghi_w_m2: f64,
    pub dni_w_m2: f64,
    pub dhi_w_m2: f64,
    /// Plane-of-array irradiance (W/m²).
    pub poa_w_m2: f64,
    pub temp_air_c: f64,
    pub wind_speed_m_s: f64,
    pub cell_temp_c: f64,
    /// DC output under real weather before losses (W).
    pub dc_real_w: f64,
    pub ac_real_w: f64,
    pub ac_clear_w: f64,
}

impl HourRecord {
    /// Zero-based local month index (0 = January).
    pub fn month_index(&self) -> usize {
        self.local_time.month0() as usize
    }
}

/// Output of a full-year run.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub hours: Vec<HourRecord>,
    /// Annual plane-of-array insolation (Wh/m²).
    pub poa_sum_wh_m2: f64,
    pub weather: WeatherCoverage,
}

impl Simulation {
    /// Annual real AC energy (kWh). Hourly watts equal watt-hours.
    pub fn annual_real_kwh(&self) -> f64 {
        self.hours.iter().map(|h| h.ac_real_w).sum::<f64>() / 1000.0
    }

    /// Annual clear-sky AC energy (kWh).
    pub fn annual_clear_kwh(&self) -> f64 {
        self.hours.iter().map(|h| h.ac_clear_w).sum::<f64>() / 1000.0
    }
}
