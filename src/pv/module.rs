//! PV module catalog and DC power model.

use serde::Serialize;

/// Version tag of the bundled module catalog.
pub const MODULE_CATALOG_VERSION: &str = "2024.1";

/// Reference irradiance at standard test conditions (W/m²).
pub const STC_IRRADIANCE_W_M2: f64 = 1000.0;
/// Reference cell temperature at standard test conditions (°C).
pub const STC_CELL_TEMP_C: f64 = 25.0;

/// Electrical and physical characteristics of one module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModuleProfile {
    pub name: &'static str,
    /// Nameplate power at STC (W).
    pub rated_power_w: f64,
    /// Power temperature coefficient (fraction per °C, negative).
    pub gamma_pdc_per_c: f64,
    /// Module area (m²).
    pub area_m2: f64,
}

pub const MODULE_CATALOG: &[ModuleProfile] = &[
    ModuleProfile {
        name: "Canadian_Solar_CS5P_220M",
        rated_power_w: 220.0,
        gamma_pdc_per_c: -0.00473,
        area_m2: 1.701,
    },
    ModuleProfile {
        name: "Canadian_Solar_CS6K_300MS",
        rated_power_w: 300.0,
        gamma_pdc_per_c: -0.0039,
        area_m2: 1.624,
    },
    ModuleProfile {
        name: "Generic_Mono_PERC_400",
        rated_power_w: 400.0,
        gamma_pdc_per_c: -0.0035,
        area_m2: 1.953,
    },
];

impl ModuleProfile {
    pub fn rated_power_kw(&self) -> f64 {
        self.rated_power_w / 1000.0
    }

    /// Nominal STC efficiency (fraction).
    pub fn efficiency(&self) -> f64 {
        self.rated_power_w / (STC_IRRADIANCE_W_M2 * self.area_m2)
    }
}

/// Looks up a catalog module by exact name.
pub fn find_module(name: &str) -> Option<&'static ModuleProfile> {
    MODULE_CATALOG.iter().find(|m| m.name == name)
}

/// The catalog module with the highest nameplate power.
pub fn highest_rated_module() -> &'static ModuleProfile {
    MODULE_CATALOG
        .iter()
        .fold(&MODULE_CATALOG[0], |best, m| {
            if m.rated_power_w > best.rated_power_w {
                m
            } else {
                best
            }
        })
}

/// PVWatts DC output of an array (W).
///
/// # Arguments
///
/// * `capacity_w` - Array nameplate at STC
/// * `gamma_pdc_per_c` - Temperature coefficient of power
/// * `poa_w_m2` - Plane-of-array irradiance
/// * `cell_temp_c` - Cell temperature
pub fn dc_output_w(capacity_w: f64, gamma_pdc_per_c: f64, poa_w_m2: f64, cell_temp_c: f64) -> f64 {
    let p = capacity_w * poa_w_m2 / STC_IRRADIANCE_W_M2
        * (1.0 + gamma_pdc_per_c * (cell_temp_c - STC_CELL_TEMP_C));
    if p.is_finite() { p.max(0.0) } else { 0.0 }
}
