//! End-to-end estimation: roof sizing, simulation, analysis and finance.

use std::fmt;

use log::info;
use serde::Serialize;

use crate::config::{ConfigError, EstimateConfig, RoofConfig};
use crate::error::EstimateError;
use crate::finance::{self, FinancialResult};
use crate::irradiance::{Ineichen, IrradianceModel};
use crate::pv::{SystemOptions, SystemSpec, build_system};
use crate::sim::{GenerationResult, HourRecord, MonthlyGeneration, Simulation, Simulator};
use crate::site::{PanelConfig, Site};
use crate::sizing::{area_from_bill, area_from_mask, size_from_area};
use crate::weather::{Timeline, WeatherCoverage, WeatherProvider, WeatherSeries, load_weather};

/// Tilts tried by the optimiser (degrees).
pub const TILT_SWEEP_DEG: [f64; 10] = [0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0];

/// Everything produced by one estimate.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    /// Usable roof area the estimate was sized from (m²).
    pub area_m2: f64,
    /// Target capacity after rounding and the minimum floor (kW).
    pub system_size_kw: f64,
    /// Orientation actually simulated (the optimum when tilt was swept).
    pub panel: PanelConfig,
    pub system: SystemSpec,
    pub weather: WeatherCoverage,
    pub generation: GenerationResult,
    pub financial: FinancialResult,
    /// Hourly detail; omitted from JSON output.
    #[serde(skip)]
    pub hours: Vec<HourRecord>,
}

impl Estimate {
    pub fn monthly_series(&self) -> Vec<MonthlyGeneration> {
        self.generation.monthly_series()
    }
}

/// Usable roof area (m²) from whichever sizing source is configured.
///
/// # Errors
///
/// Returns [`EstimateError::Validation`] if no source is set or the source
/// yields a non-positive area.
pub fn resolve_area(roof: &RoofConfig, tariff_per_kwh: f64) -> Result<f64, EstimateError> {
    let area = match (roof.area_m2, roof.monthly_bill, roof.mask_pixels) {
        (Some(area), _, _) => area,
        (None, Some(bill), _) => area_from_bill(
            bill,
            tariff_per_kwh,
            roof.specific_yield_kwh_per_kw,
            roof.module_efficiency,
        )?,
        (None, None, Some(pixels)) => area_from_mask(pixels, roof.resolution_m),
        (None, None, None) => {
            return Err(EstimateError::from(ConfigError {
                field: "roof".into(),
                message: "no sizing source configured".into(),
            }));
        }
    };
    if area.is_finite() && area > 0.0 {
        Ok(area)
    } else {
        Err(EstimateError::from(ConfigError {
            field: "roof.area_m2".into(),
            message: format!("resolved area {area} must be > 0"),
        }))
    }
}

struct Context<'a, M: IrradianceModel> {
    site: &'a Site,
    model: &'a M,
    timeline: &'a Timeline,
    weather: &'a WeatherSeries,
    albedo: f64,
}

impl<M: IrradianceModel> Context<'_, M> {
    fn simulate(&self, system: &SystemSpec, panel: PanelConfig) -> Simulation {
        Simulator::new(
            self.site,
            system,
            panel,
            self.model,
            self.timeline,
            self.weather,
            self.albedo,
        )
        .run()
    }
}

/// Sweeps [`TILT_SWEEP_DEG`] and returns the tilt with the highest annual
/// real generation and its run. Ties keep the lower tilt.
pub fn optimize_tilt<M: IrradianceModel>(
    site: &Site,
    system: &SystemSpec,
    azimuth_deg: f64,
    model: &M,
    timeline: &Timeline,
    weather: &WeatherSeries,
    albedo: f64,
) -> (PanelConfig, Simulation) {
    let ctx = Context {
        site,
        model,
        timeline,
        weather,
        albedo,
    };
    let first = PanelConfig::new(TILT_SWEEP_DEG[0], azimuth_deg);
    let mut best = (first, ctx.simulate(system, first));
    let mut best_kwh = best.1.annual_real_kwh();
    for &tilt in &TILT_SWEEP_DEG[1..] {
        let panel = PanelConfig::new(tilt, azimuth_deg);
        let sim = ctx.simulate(system, panel);
        let kwh = sim.annual_real_kwh();
        if kwh > best_kwh {
            best_kwh = kwh;
            best = (panel, sim);
        }
    }
    info!(
        "optimal tilt {:.0}° ({:.1} kWh/yr)",
        best.0.tilt_deg, best_kwh
    );
    best
}

/// Runs a complete estimate for a configuration.
///
/// Weather is fetched once from `weather`; if it is unavailable the
/// configured fallback conditions are used and the run still succeeds.
///
/// # Errors
///
/// Returns [`EstimateError::Validation`] for invalid inputs and
/// [`EstimateError::InvalidSite`] for an unusable site. No simulation is
/// performed in either case.
pub fn run_estimate(
    config: &EstimateConfig,
    weather: &dyn WeatherProvider,
) -> Result<Estimate, EstimateError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(EstimateError::Validation(errors));
    }
    let site = config.site()?;
    let options: SystemOptions = config.system_options()?;
    let finance_params = config.finance_params()?;

    let area_m2 = resolve_area(&config.roof, config.finance.tariff_per_kwh)?;
    let system_size_kw = size_from_area(area_m2, config.roof.module_efficiency)?;
    let system = build_system(system_size_kw, config.system.dc_ac_ratio, &options);
    info!(
        "{:.2} m² roof -> {:.2} kW target, {:.2} kW DC with {} x {} on {} x {}",
        area_m2,
        system_size_kw,
        system.dc_capacity_kw(),
        system.module_count(),
        system.module.name,
        system.inverter_count,
        system.inverter.name
    );

    let timeline = Timeline::representative_year(config.simulation.year, site.timezone)?;
    let series = load_weather(weather, &site, &timeline, config.weather.fallback());
    let model = Ineichen::new(config.simulation.linke_turbidity, config.simulation.altitude_m);
    let albedo = config.simulation.albedo;

    let (panel, simulation) = if config.panel.optimize_tilt {
        optimize_tilt(
            &site,
            &system,
            config.panel.azimuth_deg,
            &model,
            &timeline,
            &series,
            albedo,
        )
    } else {
        let panel = config.panel();
        let ctx = Context {
            site: &site,
            model: &model,
            timeline: &timeline,
            weather: &series,
            albedo,
        };
        (panel, ctx.simulate(&system, panel))
    };

    let generation = GenerationResult::from_simulation(&simulation, system.dc_capacity_kw());
    let financial = finance::project(&generation, system_size_kw, &finance_params);
    info!(
        "annual generation {:.1} kWh, payback {}",
        generation.annual_real_kwh, financial.payback
    );

    Ok(Estimate {
        area_m2,
        system_size_kw,
        panel,
        system,
        weather: simulation.weather,
        generation,
        financial,
        hours: simulation.hours,
    })
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- System ---")?;
        writeln!(f, "Roof area:             {:.2} m²", self.area_m2)?;
        writeln!(f, "Target size:           {:.2} kW", self.system_size_kw)?;
        writeln!(
            f,
            "Array:                 {} x {} ({:.2} kW DC)",
            self.system.module_count(),
            self.system.module.name,
            self.system.dc_capacity_kw()
        )?;
        writeln!(
            f,
            "Inverter:              {} x {} ({:.2} kW AC)",
            self.system.inverter_count,
            self.system.inverter.name,
            self.system.ac_capacity_kw()
        )?;
        writeln!(
            f,
            "Orientation:           tilt {:.0}°, azimuth {:.0}°",
            self.panel.tilt_deg, self.panel.azimuth_deg
        )?;
        writeln!(f, "Weather:               {:?}", self.weather)?;
        writeln!(f, "{}", self.generation)?;
        write!(f, "{}", self.financial)
    }
}
