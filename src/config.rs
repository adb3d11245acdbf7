//! TOML-based estimate configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::finance::{FinanceParams, SubsidyPolicy};
use crate::irradiance::clearsky::DEFAULT_LINKE_TURBIDITY;
use crate::irradiance::DEFAULT_ALBEDO;
use crate::pv::{LossFractions, RackingType, SystemOptions, find_module};
use crate::site::{PanelConfig, Site, parse_timezone};
use crate::sizing::{
    DEFAULT_MASK_RESOLUTION_M, DEFAULT_MODULE_EFFICIENCY, DEFAULT_SPECIFIC_YIELD_KWH_PER_KW,
};
use crate::weather::{FALLBACK_TEMP_AIR_C, FALLBACK_WIND_SPEED_M_S, FallbackWeather};

/// Top-level estimate configuration parsed from TOML or JSON.
///
/// All sections have defaults. Exactly one roof sizing source
/// (`area_m2`, `monthly_bill` or `mask_pixels`) must be set; use
/// [`EstimateConfig::baseline`] for a ready-to-run default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateConfig {
    /// Location and timezone.
    #[serde(default)]
    pub site: SiteConfig,
    /// How the usable roof area is obtained.
    #[serde(default)]
    pub roof: RoofConfig,
    /// Array orientation.
    #[serde(default)]
    pub panel: PanelSettings,
    /// Module, inverter and loss choices.
    #[serde(default)]
    pub system: SystemConfig,
    /// Tariff, cost and projection assumptions.
    #[serde(default)]
    pub finance: FinanceConfig,
    /// Weather source and fallback conditions.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Calendar year and atmosphere.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Location and timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// IANA timezone name.
    pub timezone: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude: 28.6139,
            longitude: 77.2090,
            timezone: "Asia/Kolkata".to_string(),
        }
    }
}

/// Roof sizing source and conversion factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoofConfig {
    /// Usable roof area (m²).
    pub area_m2: Option<f64>,
    /// Monthly electricity bill to offset (currency).
    pub monthly_bill: Option<f64>,
    /// Roof pixel count from a segmentation mask.
    pub mask_pixels: Option<u64>,
    /// Ground size of one mask pixel (m).
    pub resolution_m: f64,
    /// Capacity per unit area (kW/m² at 1 kW/m²).
    pub module_efficiency: f64,
    /// Yield assumed when sizing from a bill (kWh/kW/year).
    pub specific_yield_kwh_per_kw: f64,
}

impl Default for RoofConfig {
    fn default() -> Self {
        Self {
            area_m2: None,
            monthly_bill: None,
            mask_pixels: None,
            resolution_m: DEFAULT_MASK_RESOLUTION_M,
            module_efficiency: DEFAULT_MODULE_EFFICIENCY,
            specific_yield_kwh_per_kw: DEFAULT_SPECIFIC_YIELD_KWH_PER_KW,
        }
    }
}

impl RoofConfig {
    /// Number of sizing sources that are set.
    pub fn source_count(&self) -> usize {
        [
            self.area_m2.is_some(),
            self.monthly_bill.is_some(),
            self.mask_pixels.is_some(),
        ]
        .iter()
        .filter(|&&set| set)
        .count()
    }

    /// Replaces any sizing source with a direct area.
    pub fn set_area(&mut self, area_m2: f64) {
        self.area_m2 = Some(area_m2);
        self.monthly_bill = None;
        self.mask_pixels = None;
    }
}

/// Array orientation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelSettings {
    /// Tilt from horizontal in degrees, `[0, 90]`.
    pub tilt_deg: f64,
    /// Azimuth clockwise from north in degrees, `[0, 360)`.
    pub azimuth_deg: f64,
    /// Sweep tilts 0..=45° and keep the most productive one.
    pub optimize_tilt: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            tilt_deg: 20.0,
            azimuth_deg: 180.0,
            optimize_tilt: false,
        }
    }
}

/// Module, inverter and loss choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Catalog module name, or `"auto"` for the highest-rated module.
    pub module: String,
    pub modules_per_string: u32,
    pub dc_ac_ratio: f64,
    /// Mounting class for the cell temperature model.
    pub racking: String,
    pub soiling_loss: f64,
    pub wiring_loss: f64,
    pub mismatch_loss: f64,
    pub additional_loss: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let losses = LossFractions::default();
        Self {
            module: "auto".to_string(),
            modules_per_string: 1,
            dc_ac_ratio: 1.2,
            racking: RackingType::default().name().to_string(),
            soiling_loss: losses.soiling,
            wiring_loss: losses.wiring,
            mismatch_loss: losses.mismatch,
            additional_loss: losses.additional,
        }
    }
}

/// Tariff, cost and projection assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinanceConfig {
    pub tariff_per_kwh: f64,
    pub cost_per_kw: f64,
    pub self_consumption_ratio: f64,
    pub export_tariff_fraction: f64,
    pub degradation_rate: f64,
    pub tariff_inflation_rate: f64,
    pub projection_years: u32,
    /// `"pm_surya_ghar"`, `"pm_surya_ghar_prorated"` or `"none"`.
    pub subsidy: String,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        let p = FinanceParams::default();
        Self {
            tariff_per_kwh: p.tariff_per_kwh,
            cost_per_kw: p.cost_per_kw,
            self_consumption_ratio: p.self_consumption_ratio,
            export_tariff_fraction: p.export_tariff_fraction,
            degradation_rate: p.degradation_rate,
            tariff_inflation_rate: p.tariff_inflation_rate,
            projection_years: p.projection_years,
            subsidy: p.subsidy.name().to_string(),
        }
    }
}

/// Weather source and fallback conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// `"none"`, `"csv"` or `"open_meteo"`.
    pub source: String,
    /// File read when `source = "csv"`.
    pub csv_path: Option<PathBuf>,
    /// Network timeout for remote sources (s).
    pub timeout_secs: u64,
    pub fallback_temp_air_c: f64,
    pub fallback_wind_speed_m_s: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            source: "none".to_string(),
            csv_path: None,
            timeout_secs: 30,
            fallback_temp_air_c: FALLBACK_TEMP_AIR_C,
            fallback_wind_speed_m_s: FALLBACK_WIND_SPEED_M_S,
        }
    }
}

impl WeatherConfig {
    pub const SOURCES: &[&str] = &["none", "csv", "open_meteo"];

    pub fn fallback(&self) -> FallbackWeather {
        FallbackWeather {
            temp_air_c: self.fallback_temp_air_c,
            wind_speed_m_s: self.fallback_wind_speed_m_s,
        }
    }
}

/// Calendar year and atmosphere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Representative year; a leap day is skipped.
    pub year: i32,
    pub linke_turbidity: f64,
    /// Site altitude (m).
    pub altitude_m: f64,
    /// Ground reflectance.
    pub albedo: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            year: 2024,
            linke_turbidity: DEFAULT_LINKE_TURBIDITY,
            altitude_m: 0.0,
            albedo: DEFAULT_ALBEDO,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"roof.area_m2"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn error(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError {
        field: field.to_string(),
        message: message.into(),
    }
}

impl EstimateConfig {
    /// Returns the baseline: a 20 m² south-facing roof in New Delhi.
    pub fn baseline() -> Self {
        Self {
            roof: RoofConfig {
                area_m2: Some(20.0),
                ..RoofConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns a large-roof preset in Jaipur with tilt optimisation.
    pub fn jaipur_large_roof() -> Self {
        Self {
            site: SiteConfig {
                latitude: 26.9124,
                longitude: 75.7873,
                ..SiteConfig::default()
            },
            roof: RoofConfig {
                area_m2: Some(60.0),
                ..RoofConfig::default()
            },
            panel: PanelSettings {
                tilt_deg: 25.0,
                optimize_tilt: true,
                ..PanelSettings::default()
            },
            system: SystemConfig {
                racking: RackingType::OpenRackGlassGlass.name().to_string(),
                ..SystemConfig::default()
            },
            finance: FinanceConfig {
                tariff_per_kwh: 7.5,
                cost_per_kw: 50_000.0,
                ..FinanceConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns a bill-sized preset in Chennai on a close-mounted roof.
    pub fn chennai_bill() -> Self {
        Self {
            site: SiteConfig {
                latitude: 13.0827,
                longitude: 80.2707,
                ..SiteConfig::default()
            },
            roof: RoofConfig {
                monthly_bill: Some(3000.0),
                ..RoofConfig::default()
            },
            panel: PanelSettings {
                tilt_deg: 13.0,
                ..PanelSettings::default()
            },
            system: SystemConfig {
                racking: RackingType::CloseMountGlassGlass.name().to_string(),
                ..SystemConfig::default()
            },
            finance: FinanceConfig {
                tariff_per_kwh: 6.5,
                ..FinanceConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "jaipur_large_roof", "chennai_bill"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "jaipur_large_roof" => Ok(Self::jaipur_large_roof()),
            "chennai_bill" => Ok(Self::chennai_bill()),
            _ => Err(error(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| error("config", format!("cannot read \"{}\": {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| error("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let site = &self.site;
        if !site.latitude.is_finite() || !(-90.0..=90.0).contains(&site.latitude) {
            errors.push(error("site.latitude", "must be in [-90, 90]"));
        }
        if !site.longitude.is_finite() || !(-180.0..=180.0).contains(&site.longitude) {
            errors.push(error("site.longitude", "must be in [-180, 180]"));
        }
        if parse_timezone(&site.timezone).is_none() {
            errors.push(error(
                "site.timezone",
                format!("unknown timezone \"{}\"", site.timezone),
            ));
        }

        let roof = &self.roof;
        match roof.source_count() {
            0 => errors.push(error(
                "roof",
                "one of roof.area_m2, roof.monthly_bill or roof.mask_pixels is required",
            )),
            1 => {}
            _ => errors.push(error(
                "roof",
                "only one of roof.area_m2, roof.monthly_bill or roof.mask_pixels may be set",
            )),
        }
        if let Some(area) = roof.area_m2 {
            if !area.is_finite() || area <= 0.0 {
                errors.push(error("roof.area_m2", "must be > 0"));
            }
        }
        if let Some(bill) = roof.monthly_bill {
            if !bill.is_finite() || bill <= 0.0 {
                errors.push(error("roof.monthly_bill", "must be > 0"));
            }
        }
        if roof.mask_pixels == Some(0) {
            errors.push(error("roof.mask_pixels", "must be > 0"));
        }
        if !roof.resolution_m.is_finite() || roof.resolution_m <= 0.0 {
            errors.push(error("roof.resolution_m", "must be > 0"));
        }
        if !(roof.module_efficiency > 0.0 && roof.module_efficiency <= 1.0) {
            errors.push(error("roof.module_efficiency", "must be in (0, 1]"));
        }
        if !roof.specific_yield_kwh_per_kw.is_finite() || roof.specific_yield_kwh_per_kw <= 0.0 {
            errors.push(error("roof.specific_yield_kwh_per_kw", "must be > 0"));
        }

        let panel = &self.panel;
        if !(0.0..=90.0).contains(&panel.tilt_deg) {
            errors.push(error("panel.tilt_deg", "must be in [0, 90]"));
        }
        if !(0.0..360.0).contains(&panel.azimuth_deg) {
            errors.push(error("panel.azimuth_deg", "must be in [0, 360)"));
        }

        let sys = &self.system;
        if sys.module != "auto" && find_module(&sys.module).is_none() {
            errors.push(error(
                "system.module",
                format!("must be \"auto\" or a catalog module, got \"{}\"", sys.module),
            ));
        }
        if sys.modules_per_string == 0 {
            errors.push(error("system.modules_per_string", "must be > 0"));
        }
        if !sys.dc_ac_ratio.is_finite() || sys.dc_ac_ratio <= 0.0 {
            errors.push(error("system.dc_ac_ratio", "must be > 0"));
        }
        if RackingType::parse(&sys.racking).is_none() {
            let names: Vec<&str> = RackingType::ALL.iter().map(|r| r.name()).collect();
            errors.push(error(
                "system.racking",
                format!("must be one of {}, got \"{}\"", names.join(", "), sys.racking),
            ));
        }
        for (field, value) in [
            ("system.soiling_loss", sys.soiling_loss),
            ("system.wiring_loss", sys.wiring_loss),
            ("system.mismatch_loss", sys.mismatch_loss),
            ("system.additional_loss", sys.additional_loss),
        ] {
            if !(0.0..1.0).contains(&value) {
                errors.push(error(field, "must be in [0.0, 1.0)"));
            }
        }

        let fin = &self.finance;
        if !fin.tariff_per_kwh.is_finite() || fin.tariff_per_kwh <= 0.0 {
            errors.push(error("finance.tariff_per_kwh", "must be > 0"));
        }
        if !fin.cost_per_kw.is_finite() || fin.cost_per_kw < 0.0 {
            errors.push(error("finance.cost_per_kw", "must be >= 0"));
        }
        for (field, value) in [
            ("finance.self_consumption_ratio", fin.self_consumption_ratio),
            ("finance.export_tariff_fraction", fin.export_tariff_fraction),
            ("finance.degradation_rate", fin.degradation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(error(field, "must be in [0.0, 1.0]"));
            }
        }
        if !fin.tariff_inflation_rate.is_finite() || fin.tariff_inflation_rate <= -1.0 {
            errors.push(error("finance.tariff_inflation_rate", "must be > -1"));
        }
        if !(1..=100).contains(&fin.projection_years) {
            errors.push(error("finance.projection_years", "must be in [1, 100]"));
        }
        if SubsidyPolicy::parse(&fin.subsidy).is_none() {
            let names: Vec<&str> = SubsidyPolicy::ALL.iter().map(|p| p.name()).collect();
            errors.push(error(
                "finance.subsidy",
                format!("must be one of {}, got \"{}\"", names.join(", "), fin.subsidy),
            ));
        }

        let w = &self.weather;
        if !WeatherConfig::SOURCES.contains(&w.source.as_str()) {
            errors.push(error(
                "weather.source",
                format!(
                    "must be one of {}, got \"{}\"",
                    WeatherConfig::SOURCES.join(", "),
                    w.source
                ),
            ));
        }
        if w.source == "csv" && w.csv_path.is_none() {
            errors.push(error("weather.csv_path", "is required when weather.source = \"csv\""));
        }
        if !(-60.0..=60.0).contains(&w.fallback_temp_air_c) {
            errors.push(error("weather.fallback_temp_air_c", "must be in [-60, 60]"));
        }
        if !(0.0..=60.0).contains(&w.fallback_wind_speed_m_s) {
            errors.push(error("weather.fallback_wind_speed_m_s", "must be in [0, 60]"));
        }

        let sim = &self.simulation;
        if !(1901..=2099).contains(&sim.year) {
            errors.push(error("simulation.year", "must be in [1901, 2099]"));
        }
        if !(sim.linke_turbidity >= 1.0 && sim.linke_turbidity <= 10.0) {
            errors.push(error("simulation.linke_turbidity", "must be in [1, 10]"));
        }
        if !(-500.0..=9000.0).contains(&sim.altitude_m) {
            errors.push(error("simulation.altitude_m", "must be in [-500, 9000]"));
        }
        if !(0.0..=1.0).contains(&sim.albedo) {
            errors.push(error("simulation.albedo", "must be in [0.0, 1.0]"));
        }

        errors
    }

    /// Site built from the `[site]` section.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidSite`] for bad coordinates or timezone.
    pub fn site(&self) -> Result<Site, EstimateError> {
        Site::with_timezone_name(self.site.latitude, self.site.longitude, &self.site.timezone)
    }

    pub fn panel(&self) -> PanelConfig {
        PanelConfig::new(self.panel.tilt_deg, self.panel.azimuth_deg)
    }

    /// System builder options from the `[system]` section.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unknown module or racking name.
    pub fn system_options(&self) -> Result<SystemOptions, ConfigError> {
        let sys = &self.system;
        let module = match sys.module.as_str() {
            "auto" => None,
            name => Some(
                find_module(name)
                    .ok_or_else(|| error("system.module", format!("unknown module \"{name}\"")))?,
            ),
        };
        let racking = RackingType::parse(&sys.racking)
            .ok_or_else(|| error("system.racking", format!("unknown racking \"{}\"", sys.racking)))?;
        Ok(SystemOptions {
            module,
            modules_per_string: sys.modules_per_string,
            losses: LossFractions {
                soiling: sys.soiling_loss,
                wiring: sys.wiring_loss,
                mismatch: sys.mismatch_loss,
                additional: sys.additional_loss,
            },
            racking,
        })
    }

    /// Financial assumptions from the `[finance]` section.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unknown subsidy policy.
    pub fn finance_params(&self) -> Result<FinanceParams, ConfigError> {
        let fin = &self.finance;
        let subsidy = SubsidyPolicy::parse(&fin.subsidy)
            .ok_or_else(|| error("finance.subsidy", format!("unknown policy \"{}\"", fin.subsidy)))?;
        Ok(FinanceParams {
            tariff_per_kwh: fin.tariff_per_kwh,
            cost_per_kw: fin.cost_per_kw,
            self_consumption_ratio: fin.self_consumption_ratio,
            export_tariff_fraction: fin.export_tariff_fraction,
            degradation_rate: fin.degradation_rate,
            tariff_inflation_rate: fin.tariff_inflation_rate,
            projection_years: fin.projection_years,
            subsidy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = EstimateConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = EstimateConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.err().map(|e| e.message).unwrap_or_default();
        assert!(e.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in EstimateConfig::PRESETS {
            let cfg = EstimateConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[site]
latitude = 19.076
longitude = 72.8777
timezone = "Asia/Kolkata"

[roof]
area_m2 = 35.0

[panel]
tilt_deg = 18.0
azimuth_deg = 170.0

[system]
module = "Canadian_Solar_CS5P_220M"
modules_per_string = 10
racking = "close_mount_glass_glass"

[finance]
tariff_per_kwh = 9.0
subsidy = "pm_surya_ghar_prorated"

[weather]
source = "csv"
csv_path = "weather/mumbai.csv"
"#;
        let cfg = EstimateConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.roof.area_m2), Some(Some(35.0)));
        assert_eq!(cfg.as_ref().map(|c| c.system.modules_per_string), Some(10));
        assert_eq!(cfg.as_ref().map(|c| c.validate().len()), Some(0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[roof]
area_m2 = 20.0
bogus_field = true
"#;
        assert!(EstimateConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[roof]
area_m2 = 12.5
"#;
        let cfg = EstimateConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.panel.tilt_deg), Some(20.0));
        assert_eq!(cfg.as_ref().map(|c| c.finance.projection_years), Some(10));
        assert_eq!(cfg.as_ref().map(|c| c.site.timezone.as_str()), Some("Asia/Kolkata"));
    }

    #[test]
    fn validation_requires_one_roof_source() {
        let mut cfg = EstimateConfig::baseline();
        cfg.roof.area_m2 = None;
        assert!(cfg.validate().iter().any(|e| e.field == "roof"));

        let mut cfg = EstimateConfig::baseline();
        cfg.roof.monthly_bill = Some(2000.0);
        assert!(cfg.validate().iter().any(|e| e.field == "roof"));
    }

    #[test]
    fn validation_catches_non_positive_area() {
        let mut cfg = EstimateConfig::baseline();
        cfg.roof.area_m2 = Some(0.0);
        assert!(cfg.validate().iter().any(|e| e.field == "roof.area_m2"));
    }

    #[test]
    fn validation_catches_bad_tilt_and_azimuth() {
        let mut cfg = EstimateConfig::baseline();
        cfg.panel.tilt_deg = 95.0;
        cfg.panel.azimuth_deg = -10.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "panel.tilt_deg"));
        assert!(errors.iter().any(|e| e.field == "panel.azimuth_deg"));
    }

    #[test]
    fn validation_catches_bad_names() {
        let mut cfg = EstimateConfig::baseline();
        cfg.system.racking = "duct_tape".to_string();
        cfg.system.module = "Mystery_9000".to_string();
        cfg.finance.subsidy = "lottery".to_string();
        cfg.weather.source = "almanac".to_string();
        let errors = cfg.validate();
        for field in ["system.racking", "system.module", "finance.subsidy", "weather.source"] {
            assert!(errors.iter().any(|e| e.field == field), "missing {field}");
        }
    }

    #[test]
    fn validation_catches_unknown_timezone() {
        let mut cfg = EstimateConfig::baseline();
        cfg.site.timezone = "Asia/Atlantis".to_string();
        assert!(cfg.validate().iter().any(|e| e.field == "site.timezone"));
    }

    #[test]
    fn csv_source_needs_a_path() {
        let mut cfg = EstimateConfig::baseline();
        cfg.weather.source = "csv".to_string();
        assert!(cfg.validate().iter().any(|e| e.field == "weather.csv_path"));
    }

    #[test]
    fn zero_tariff_is_rejected() {
        let mut cfg = EstimateConfig::baseline();
        cfg.finance.tariff_per_kwh = 0.0;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "finance.tariff_per_kwh");

        let mut bill = EstimateConfig::chennai_bill();
        bill.finance.tariff_per_kwh = -2.0;
        assert_eq!(bill.validate().len(), 1);
    }

    #[test]
    fn azimuth_is_half_open() {
        let mut cfg = EstimateConfig::baseline();
        cfg.panel.azimuth_deg = 0.0;
        assert!(cfg.validate().is_empty());
        cfg.panel.azimuth_deg = 359.9;
        assert!(cfg.validate().is_empty());
        cfg.panel.azimuth_deg = 360.0;
        assert!(cfg.validate().iter().any(|e| e.field == "panel.azimuth_deg"));
    }

    #[test]
    fn total_loss_and_empty_projection_are_rejected() {
        let mut cfg = EstimateConfig::baseline();
        cfg.system.soiling_loss = 1.0;
        cfg.finance.projection_years = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.soiling_loss"));
        assert!(errors.iter().any(|e| e.field == "finance.projection_years"));

        cfg.system.soiling_loss = 0.99;
        cfg.finance.projection_years = 1;
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn set_area_clears_other_sources() {
        let mut cfg = EstimateConfig::chennai_bill();
        cfg.roof.set_area(30.0);
        assert_eq!(cfg.roof.source_count(), 1);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn options_follow_config() {
        let mut cfg = EstimateConfig::baseline();
        cfg.system.module = "Canadian_Solar_CS5P_220M".to_string();
        cfg.system.racking = "insulated_back_glass_polymer".to_string();
        let opts = cfg.system_options().ok();
        assert_eq!(opts.and_then(|o| o.module).map(|m| m.rated_power_w), Some(220.0));
        assert_eq!(opts.map(|o| o.racking), Some(RackingType::InsulatedBackGlassPolymer));
    }

    #[test]
    fn json_round_trip_keeps_sections() {
        let cfg = EstimateConfig::jaipur_large_roof();
        let json = serde_json::to_string(&cfg).unwrap_or_default();
        let back: Option<EstimateConfig> = serde_json::from_str(&json).ok();
        assert_eq!(back.as_ref().map(|c| c.roof.area_m2), Some(Some(60.0)));
        assert_eq!(back.map(|c| c.panel.optimize_tilt), Some(true));
    }
}
