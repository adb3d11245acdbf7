//! Sizing a concrete system from a target capacity.

use log::debug;
use serde::Serialize;

use super::inverter::{INVERTER_CATALOG, InverterProfile, nearest_inverter};
use super::module::{ModuleProfile, highest_rated_module};
use super::temperature::RackingType;

/// Smallest system the builder will size for (kW).
pub const MIN_SYSTEM_SIZE_KW: f64 = 0.1;

/// Default DC-to-AC sizing ratio.
pub const DEFAULT_DC_AC_RATIO: f64 = 1.2;

/// Fractional losses applied to real-weather AC output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LossFractions {
    pub soiling: f64,
    pub wiring: f64,
    pub mismatch: f64,
    pub additional: f64,
}

impl Default for LossFractions {
    fn default() -> Self {
        Self {
            soiling: 0.02,
            wiring: 0.02,
            mismatch: 0.02,
            additional: 0.05,
        }
    }
}

impl LossFractions {
    /// No losses at all.
    pub const NONE: Self = Self {
        soiling: 0.0,
        wiring: 0.0,
        mismatch: 0.0,
        additional: 0.0,
    };

    /// Multiplicative factor in `[0, 1]` left after all losses.
    pub fn derate_factor(&self) -> f64 {
        [self.soiling, self.wiring, self.mismatch, self.additional]
            .iter()
            .map(|l| 1.0 - l.clamp(0.0, 1.0))
            .product()
    }
}

/// Choices the builder cannot infer from the target size alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemOptions {
    /// Module to use; `None` selects the highest-rated catalog entry.
    pub module: Option<&'static ModuleProfile>,
    pub modules_per_string: u32,
    pub losses: LossFractions,
    pub racking: RackingType,
}

impl Default for SystemOptions {
    fn default() -> Self {
        Self {
            module: None,
            modules_per_string: 1,
            losses: LossFractions::default(),
            racking: RackingType::default(),
        }
    }
}

/// A sized PV system: modules and strings feeding identical inverters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSpec {
    /// Requested capacity after the minimum-size floor (kW).
    pub target_size_kw: f64,
    pub module: ModuleProfile,
    pub modules_per_string: u32,
    pub strings: u32,
    pub inverter: InverterProfile,
    /// Identical inverters sharing the array equally.
    pub inverter_count: u32,
    pub dc_ac_ratio: f64,
    pub losses: LossFractions,
    pub racking: RackingType,
}

impl SystemSpec {
    /// Installed DC nameplate (kW).
    pub fn dc_capacity_kw(&self) -> f64 {
        self.module.rated_power_kw() * f64::from(self.modules_per_string) * f64::from(self.strings)
    }

    pub fn module_count(&self) -> u32 {
        self.modules_per_string * self.strings
    }

    /// Combined AC rating of all inverters (kW).
    pub fn ac_capacity_kw(&self) -> f64 {
        self.inverter.rated_ac_kw * f64::from(self.inverter_count)
    }

    /// AC output (W) of the inverter bank for an array DC output (W).
    pub fn ac_output_w(&self, dc_w: f64) -> f64 {
        let n = f64::from(self.inverter_count.max(1));
        self.inverter.ac_output_w(dc_w / n) * n
    }
}

/// Sizes a system for a target capacity.
///
/// The string count is the whole number of strings that fits the target,
/// never less than one. The inverter is the catalog entry whose AC rating is
/// closest to `target / dc_ac_ratio`. Targets beyond the largest catalog
/// inverter are split over `ceil(target_ac / largest_ac)` identical units,
/// each matched to its share.
///
/// # Arguments
///
/// * `target_size_kw` - Desired DC capacity; floored at [`MIN_SYSTEM_SIZE_KW`]
/// * `dc_ac_ratio` - DC/AC sizing ratio; non-positive values fall back to 1.0
/// * `options` - Module, stringing, loss and mounting choices
pub fn build_system(target_size_kw: f64, dc_ac_ratio: f64, options: &SystemOptions) -> SystemSpec {
    let target = target_size_kw.max(MIN_SYSTEM_SIZE_KW);
    let module = options.module.unwrap_or_else(highest_rated_module);
    let per_string = options.modules_per_string.max(1);
    let string_kw = module.rated_power_kw() * f64::from(per_string);
    // Tolerate float noise such as 3.6 / 0.4 landing just under 9.
    let strings = ((target / string_kw + 1e-9).floor() as u32).max(1);
    let ratio = if dc_ac_ratio.is_finite() && dc_ac_ratio > 0.0 {
        dc_ac_ratio
    } else {
        1.0
    };
    let target_ac = target / ratio;
    let largest_ac = INVERTER_CATALOG
        .iter()
        .map(|inv| inv.rated_ac_kw)
        .fold(0.0_f64, f64::max);
    let inverter_count = ((target_ac / largest_ac - 1e-9).ceil() as u32).max(1);
    let inverter = nearest_inverter(target_ac / f64::from(inverter_count));

    let spec = SystemSpec {
        target_size_kw: target,
        module: *module,
        modules_per_string: per_string,
        strings,
        inverter: *inverter,
        inverter_count,
        dc_ac_ratio: ratio,
        losses: options.losses,
        racking: options.racking,
    };
    debug!(
        "sized {:.2} kW target as {} x {} ({:.2} kW DC) on {} x {}",
        target,
        strings,
        module.name,
        spec.dc_capacity_kw(),
        inverter_count,
        inverter.name
    );
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pv::module::find_module;

    #[test]
    fn default_losses_derate() {
        let f = LossFractions::default().derate_factor();
        assert!((f - 0.98 * 0.98 * 0.98 * 0.95).abs() < 1e-12);
        assert_eq!(LossFractions::NONE.derate_factor(), 1.0);
    }

    #[test]
    fn out_of_range_losses_are_clamped() {
        let l = LossFractions {
            soiling: -0.5,
            wiring: 1.5,
            ..LossFractions::NONE
        };
        assert_eq!(l.derate_factor(), 0.0);
    }

    #[test]
    fn sizes_whole_strings_under_target() {
        let spec = build_system(3.6, 1.2, &SystemOptions::default());
        assert_eq!(spec.strings, 9);
        assert!((spec.dc_capacity_kw() - 3.6).abs() < 1e-9);
        assert_eq!(spec.inverter.rated_ac_kw, 3.0);
        assert_eq!(spec.inverter_count, 1);
    }

    #[test]
    fn large_arrays_share_several_inverters() {
        // 80 kW / 1.2 = 66.7 kW AC, beyond the 50 kW catalog maximum
        let spec = build_system(80.0, 1.2, &SystemOptions::default());
        assert_eq!(spec.inverter_count, 2);
        assert_eq!(spec.inverter.rated_ac_kw, 30.0);
        assert_eq!(spec.ac_capacity_kw(), 60.0);

        // Full array output is clipped at the bank rating, not one unit.
        let clipped = spec.ac_output_w(spec.dc_capacity_kw() * 1000.0);
        assert!(clipped > 50_000.0 && clipped <= 60_000.0 + 1e-9);
        assert_eq!(spec.ac_output_w(0.0), 0.0);
    }

    #[test]
    fn exactly_the_largest_inverter_stays_single() {
        let spec = build_system(60.0, 1.2, &SystemOptions::default());
        assert_eq!(spec.inverter_count, 1);
        assert_eq!(spec.inverter.rated_ac_kw, 50.0);
    }

    #[test]
    fn legacy_stringing_uses_one_string_for_small_roofs() {
        let opts = SystemOptions {
            module: find_module("Canadian_Solar_CS5P_220M"),
            modules_per_string: 10,
            ..SystemOptions::default()
        };
        let spec = build_system(1.5, 1.0, &opts);
        assert_eq!(spec.strings, 1);
        assert_eq!(spec.module_count(), 10);
        assert!((spec.dc_capacity_kw() - 2.2).abs() < 1e-9);
    }

    #[test]
    fn tiny_target_is_floored() {
        let spec = build_system(0.0, 1.2, &SystemOptions::default());
        assert_eq!(spec.target_size_kw, MIN_SYSTEM_SIZE_KW);
        assert_eq!(spec.strings, 1);
        assert_eq!(spec.inverter.rated_ac_kw, 0.25);
    }

    #[test]
    fn nan_target_is_floored() {
        let spec = build_system(f64::NAN, f64::NAN, &SystemOptions::default());
        assert_eq!(spec.target_size_kw, MIN_SYSTEM_SIZE_KW);
        assert_eq!(spec.dc_ac_ratio, 1.0);
    }
}
