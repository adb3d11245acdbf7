pub mod subsidy;

use std::fmt;

use serde::Serialize;

use crate::sim::GenerationResult;

pub use subsidy::SubsidyPolicy;

/// Economic assumptions for the payback and projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinanceParams {
    /// Retail electricity tariff (currency/kWh).
    pub tariff_per_kwh: f64,
    /// Installed cost per kW of capacity.
    pub cost_per_kw: f64,
    /// Share of generation consumed on site, in `[0, 1]`.
    pub self_consumption_ratio: f64,
    /// Export tariff as a fraction of the retail tariff.
    pub export_tariff_fraction: f64,
    /// Yearly fractional loss of generation.
    pub degradation_rate: f64,
    /// Yearly fractional tariff increase.
    pub tariff_inflation_rate: f64,
    pub projection_years: u32,
    pub subsidy: SubsidyPolicy,
}

impl Default for FinanceParams {
    fn default() -> Self {
        Self {
            tariff_per_kwh: 8.0,
            cost_per_kw: 55_000.0,
            self_consumption_ratio: 0.7,
            export_tariff_fraction: 0.6,
            degradation_rate: 0.005,
            tariff_inflation_rate: 0.05,
            projection_years: 10,
            subsidy: SubsidyPolicy::default(),
        }
    }
}

/// Years until cumulative savings repay the net cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payback {
    Years(f64),
    /// Savings never repay the cost (zero or negative savings or net cost).
    Unreachable,
}

impl Payback {
    pub fn years(self) -> Option<f64> {
        match self {
            Self::Years(y) => Some(y),
            Self::Unreachable => None,
        }
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(y) => write!(f, "{y:.1} years"),
            Self::Unreachable => f.write_str("never"),
        }
    }
}

/// One row of the multi-year projection. `year` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub generation_kwh: f64,
    pub tariff_per_kwh: f64,
    pub savings: f64,
    pub cumulative_savings: f64,
}

/// Cost, savings, payback and projection for one system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialResult {
    pub installation_cost: f64,
    pub subsidy: f64,
    pub net_cost: f64,
    /// First-year savings under net metering.
    pub annual_savings: f64,
    pub payback: Payback,
    /// First-year savings as a share of net cost (%).
    pub roi_percent: f64,
    pub projection: Vec<ProjectionYear>,
}

/// Savings from one year of generation under net metering.
///
/// Self-consumed energy is valued at the retail tariff, the remainder at
/// the export tariff.
pub fn net_metering_savings(
    generation_kwh: f64,
    tariff_per_kwh: f64,
    self_consumption_ratio: f64,
    export_tariff_fraction: f64,
) -> f64 {
    let self_ratio = self_consumption_ratio.clamp(0.0, 1.0);
    let consumed = generation_kwh * self_ratio;
    let exported = generation_kwh * (1.0 - self_ratio);
    let savings = consumed * tariff_per_kwh + exported * tariff_per_kwh * export_tariff_fraction;
    if savings.is_finite() { savings } else { 0.0 }
}

impl FinancialResult {
    /// Computes costs, payback and the projection.
    ///
    /// # Arguments
    ///
    /// * `annual_generation_kwh` - First-year real generation
    /// * `system_size_kw` - Capacity billed and subsidised
    /// * `params` - Economic assumptions
    pub fn project(annual_generation_kwh: f64, system_size_kw: f64, params: &FinanceParams) -> Self {
        let installation_cost = (system_size_kw * params.cost_per_kw).round();
        let subsidy = params.subsidy.subsidy(system_size_kw, params.cost_per_kw);
        let net_cost = installation_cost - subsidy;
        let annual_savings = net_metering_savings(
            annual_generation_kwh,
            params.tariff_per_kwh,
            params.self_consumption_ratio,
            params.export_tariff_fraction,
        );

        let (payback, roi_percent) = if annual_savings > 0.0 && net_cost > 0.0 {
            (
                Payback::Years(net_cost / annual_savings),
                100.0 * annual_savings / net_cost,
            )
        } else {
            (Payback::Unreachable, 0.0)
        };

        let mut cumulative = 0.0;
        let projection = (1..=params.projection_years)
            .map(|year| {
                let n = f64::from(year - 1);
                let generation_kwh = annual_generation_kwh * (1.0 - params.degradation_rate).powf(n);
                let tariff_per_kwh = params.tariff_per_kwh * (1.0 + params.tariff_inflation_rate).powf(n);
                let savings = net_metering_savings(
                    generation_kwh,
                    tariff_per_kwh,
                    params.self_consumption_ratio,
                    params.export_tariff_fraction,
                );
                cumulative += savings;
                ProjectionYear {
                    year,
                    generation_kwh,
                    tariff_per_kwh,
                    savings,
                    cumulative_savings: cumulative,
                }
            })
            .collect();

        Self {
            installation_cost,
            subsidy,
            net_cost,
            annual_savings,
            payback,
            roi_percent,
            projection,
        }
    }

    /// Yearly savings column of the projection.
    pub fn yearly_savings(&self) -> Vec<f64> {
        self.projection.iter().map(|p| p.savings).collect()
    }

    /// Cumulative savings column of the projection.
    pub fn cumulative_savings(&self) -> Vec<f64> {
        self.projection.iter().map(|p| p.cumulative_savings).collect()
    }

    /// First projection year whose cumulative savings reach the net cost.
    pub fn break_even_year(&self) -> Option<u32> {
        if self.net_cost <= 0.0 {
            return None;
        }
        self.projection
            .iter()
            .find(|p| p.cumulative_savings >= self.net_cost)
            .map(|p| p.year)
    }
}

/// Financial outcome for an analysed generation result.
pub fn project(generation: &GenerationResult, system_size_kw: f64, params: &FinanceParams) -> FinancialResult {
    FinancialResult::project(generation.annual_real_kwh, system_size_kw, params)
}

impl fmt::Display for FinancialResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Financials ---")?;
        writeln!(f, "Installation cost:     {:.0}", self.installation_cost)?;
        writeln!(f, "Subsidy:               {:.0}", self.subsidy)?;
        writeln!(f, "Net cost:              {:.0}", self.net_cost)?;
        writeln!(f, "Annual savings:        {:.2}", self.annual_savings)?;
        writeln!(f, "Payback:               {}", self.payback)?;
        write!(f, "ROI:                   {:.1}%", self.roi_percent)?;
        for p in &self.projection {
            write!(
                f,
                "\n  year {:>2}: {:>9.1} kWh @ {:.2} -> {:>10.2} (cum. {:.2})",
                p.year, p.generation_kwh, p.tariff_per_kwh, p.savings, p.cumulative_savings
            )?;
        }
        Ok(())
    }
}
