//! Post-hoc generation metrics from a simulation run.

use std::fmt;

use serde::Serialize;

use super::types::{HourRecord, Simulation};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Annual and monthly energy with quality ratios.
///
/// Values are kept unrounded; rounding happens only when displayed or
/// exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    /// Real-weather AC energy after losses (kWh).
    pub annual_real_kwh: f64,
    /// Clear-sky reference AC energy (kWh).
    pub annual_clear_kwh: f64,
    /// Real-weather energy per local calendar month (kWh), January first.
    pub monthly_real_kwh: [f64; 12],
    /// Annual plane-of-array insolation (kWh/m²).
    pub poa_kwh_m2: f64,
    /// Real energy over the ideal energy implied by insolation and capacity.
    pub performance_ratio: f64,
    /// Share of clear-sky energy lost to weather and losses (%).
    pub weather_loss_percent: f64,
    /// Real energy per installed kW (kWh/kW).
    pub specific_yield_kwh_per_kw: f64,
}

/// One row of the monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyGeneration {
    /// Calendar month, 1 = January.
    pub month: u32,
    pub real_kwh: f64,
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

impl GenerationResult {
    /// Computes all metrics from hourly records.
    ///
    /// # Arguments
    ///
    /// * `hours` - Hourly records of a run
    /// * `poa_sum_wh_m2` - Annual plane-of-array insolation
    /// * `system_size_kw` - Capacity used to normalise PR and specific yield
    ///
    /// # Returns
    ///
    /// A `GenerationResult` whose ratios are 0 whenever their denominator
    /// is zero or the result would not be finite.
    pub fn analyze(hours: &[HourRecord], poa_sum_wh_m2: f64, system_size_kw: f64) -> Self {
        let mut monthly_wh = [0.0_f64; 12];
        let mut real_wh = 0.0_f64;
        let mut clear_wh = 0.0_f64;
        for h in hours {
            monthly_wh[h.month_index()] += h.ac_real_w;
            real_wh += h.ac_real_w;
            clear_wh += h.ac_clear_w;
        }

        let annual_real_kwh = real_wh / 1000.0;
        let annual_clear_kwh = clear_wh / 1000.0;
        let poa_kwh_m2 = poa_sum_wh_m2 / 1000.0;

        let performance_ratio = if system_size_kw > 0.0 && poa_kwh_m2 > 0.0 {
            finite_or_zero(annual_real_kwh / (system_size_kw * poa_kwh_m2))
        } else {
            0.0
        };
        let weather_loss_percent = if annual_clear_kwh > 0.0 {
            finite_or_zero(100.0 * (annual_clear_kwh - annual_real_kwh) / annual_clear_kwh)
        } else {
            0.0
        };
        let specific_yield_kwh_per_kw = if system_size_kw > 0.0 {
            finite_or_zero(annual_real_kwh / system_size_kw)
        } else {
            0.0
        };

        Self {
            annual_real_kwh,
            annual_clear_kwh,
            monthly_real_kwh: monthly_wh.map(|wh| wh / 1000.0),
            poa_kwh_m2,
            performance_ratio,
            weather_loss_percent,
            specific_yield_kwh_per_kw,
        }
    }

    /// Convenience wrapper over [`GenerationResult::analyze`].
    pub fn from_simulation(sim: &Simulation, system_size_kw: f64) -> Self {
        Self::analyze(&sim.hours, sim.poa_sum_wh_m2, system_size_kw)
    }

    /// Monthly series as `(month, kWh)` rows for charting and export.
    pub fn monthly_series(&self) -> Vec<MonthlyGeneration> {
        self.monthly_real_kwh
            .iter()
            .zip(1..)
            .map(|(&real_kwh, month)| MonthlyGeneration { month, real_kwh })
            .collect()
    }
}

impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Generation ---")?;
        writeln!(f, "Annual generation:     {:.2} kWh", self.annual_real_kwh)?;
        writeln!(f, "Clear-sky potential:   {:.2} kWh", self.annual_clear_kwh)?;
        writeln!(f, "Specific yield:        {:.1} kWh/kW", self.specific_yield_kwh_per_kw)?;
        writeln!(f, "POA insolation:        {:.1} kWh/m²", self.poa_kwh_m2)?;
        writeln!(f, "Performance ratio:     {:.3}", self.performance_ratio)?;
        write!(f, "Weather loss:          {:.2}%", self.weather_loss_percent)?;
        for (name, kwh) in MONTH_NAMES.iter().zip(self.monthly_real_kwh) {
            write!(f, "\n  {name}: {kwh:>9.2} kWh")?;
        }
        Ok(())
    }
}
