//! Inverter catalog and AC conversion.

use std::f64::consts::PI;

use serde::Serialize;

/// Version tag of the bundled inverter catalog.
pub const INVERTER_CATALOG_VERSION: &str = "2024.1";

/// Inverter rating used for conversion and clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InverterProfile {
    pub name: &'static str,
    /// Maximum AC output (kW).
    pub rated_ac_kw: f64,
    /// DC input at which rated AC output is reached (kW).
    pub rated_dc_kw: f64,
}

const fn inverter(name: &'static str, rated_ac_kw: f64, rated_dc_kw: f64) -> InverterProfile {
    InverterProfile {
        name,
        rated_ac_kw,
        rated_dc_kw,
    }
}

pub const INVERTER_CATALOG: &[InverterProfile] = &[
    inverter("ABB_MICRO_0_25_I_OUTD_US_208", 0.25, 0.259),
    inverter("Generic_String_1kW", 1.0, 1.04),
    inverter("Generic_String_2kW", 2.0, 2.07),
    inverter("Generic_String_3kW", 3.0, 3.1),
    inverter("Generic_String_3_6kW", 3.6, 3.72),
    inverter("Generic_String_4kW", 4.0, 4.13),
    inverter("Generic_String_5kW", 5.0, 5.15),
    inverter("Generic_String_6kW", 6.0, 6.18),
    inverter("Generic_String_8kW", 8.0, 8.24),
    inverter("Generic_String_10kW", 10.0, 10.3),
    inverter("Generic_String_12kW", 12.0, 12.36),
    inverter("Generic_String_15kW", 15.0, 15.45),
    inverter("Generic_String_20kW", 20.0, 20.6),
    inverter("Generic_String_25kW", 25.0, 25.75),
    inverter("Generic_String_30kW", 30.0, 30.9),
    inverter("Generic_Central_50kW", 50.0, 51.5),
];

/// Picks the catalog inverter whose AC rating is closest to `target_ac_kw`.
///
/// Ties go to the earlier catalog entry.
pub fn nearest_inverter(target_ac_kw: f64) -> &'static InverterProfile {
    let mut best = &INVERTER_CATALOG[0];
    let mut best_diff = (best.rated_ac_kw - target_ac_kw).abs();
    for inv in &INVERTER_CATALOG[1..] {
        let diff = (inv.rated_ac_kw - target_ac_kw).abs();
        if diff < best_diff {
            best = inv;
            best_diff = diff;
        }
    }
    best
}

impl InverterProfile {
    /// Conversion efficiency (0..1) at a DC input power in watts.
    ///
    /// The curve rises steeply at low load, peaks near 97 % and sags
    /// slightly toward full load.
    pub fn efficiency(&self, dc_w: f64) -> f64 {
        let rated_dc_w = self.rated_dc_kw * 1000.0;
        if rated_dc_w <= 0.0 || dc_w <= 0.0 {
            return 0.0;
        }
        let ratio = dc_w.min(rated_dc_w) / rated_dc_w;
        let rising = 97.2 * (1.0 - 0.18 / (1.0 + (21.0 * ratio).exp()));
        let sagging = 0.5 * (PI * ratio).cos() + 96.9;
        let onset = 97.2 * (30.0 * ratio).tanh();
        rising.min(sagging).min(onset) / 100.0
    }

    /// AC output (W) for a DC input (W), clipped at the AC rating.
    pub fn ac_output_w(&self, dc_w: f64) -> f64 {
        if !dc_w.is_finite() || dc_w <= 0.0 {
            return 0.0;
        }
        let dc = dc_w.min(self.rated_dc_kw * 1000.0);
        (dc * self.efficiency(dc)).min(self.rated_ac_kw * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_picks_closest_rating() {
        assert_eq!(nearest_inverter(3.0).rated_ac_kw, 3.0);
        assert_eq!(nearest_inverter(0.1).rated_ac_kw, 0.25);
        assert_eq!(nearest_inverter(1000.0).rated_ac_kw, 50.0);
    }

    #[test]
    fn ties_prefer_catalog_order() {
        // 2.5 kW is equidistant from the 2 kW and 3 kW units.
        assert_eq!(nearest_inverter(2.5).rated_ac_kw, 2.0);
    }

    #[test]
    fn efficiency_is_bounded() {
        let inv = nearest_inverter(5.0);
        for step in 0..=120 {
            let dc = f64::from(step) * 50.0;
            let eff = inv.efficiency(dc);
            assert!((0.0..=0.98).contains(&eff), "eff {eff} at {dc} W");
        }
    }

    #[test]
    fn efficiency_is_high_at_mid_load() {
        let inv = nearest_inverter(5.0);
        let eff = inv.efficiency(inv.rated_dc_kw * 500.0);
        assert!(eff > 0.95, "eff {eff}");
    }

    #[test]
    fn output_is_clipped_at_rating() {
        let inv = nearest_inverter(3.0);
        let ac = inv.ac_output_w(10_000.0);
        assert!(ac <= inv.rated_ac_kw * 1000.0);
        assert!(ac > 0.0);
    }

    #[test]
    fn no_input_no_output() {
        let inv = nearest_inverter(3.0);
        assert_eq!(inv.ac_output_w(0.0), 0.0);
        assert_eq!(inv.ac_output_w(-10.0), 0.0);
        assert_eq!(inv.ac_output_w(f64::NAN), 0.0);
    }
}
