//! Ineichen–Perez clear-sky irradiance.

use super::solar_position::{SolarPosition, extraterrestrial_irradiance};

/// Default Linke turbidity for a moderately hazy atmosphere.
pub const DEFAULT_LINKE_TURBIDITY: f64 = 3.0;

/// Global, direct-normal and diffuse clear-sky components (W/m²).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClearSky {
    pub ghi: f64,
    pub dni: f64,
    pub dhi: f64,
}

/// Ineichen–Perez clear-sky model with a fixed Linke turbidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ineichen {
    pub linke_turbidity: f64,
    /// Site altitude above sea level (m).
    pub altitude_m: f64,
}

impl Default for Ineichen {
    fn default() -> Self {
        Self {
            linke_turbidity: DEFAULT_LINKE_TURBIDITY,
            altitude_m: 0.0,
        }
    }
}

/// Kasten–Young relative optical air mass.
pub fn relative_airmass(zenith_deg: f64) -> f64 {
    let cos_z = zenith_deg.to_radians().cos();
    1.0 / (cos_z + 0.50572 * (96.07995 - zenith_deg).powf(-1.6364))
}

/// Standard-atmosphere pressure at an altitude (Pa).
pub fn pressure_at_altitude(altitude_m: f64) -> f64 {
    100.0 * ((44331.514 - altitude_m) / 11880.516).powf(1.0 / 0.1902632)
}

impl Ineichen {
    pub fn new(linke_turbidity: f64, altitude_m: f64) -> Self {
        Self {
            linke_turbidity,
            altitude_m,
        }
    }

    /// Clear-sky components for a sun position on a given day of year.
    ///
    /// Returns all zeros when the sun is at or below the horizon.
    pub fn components(&self, position: &SolarPosition, day_of_year: u32) -> ClearSky {
        if !position.is_up() {
            return ClearSky::default();
        }
        let cos_z = position.zenith_deg.to_radians().cos();
        let tl = self.linke_turbidity;
        let h = self.altitude_m;
        let i0 = extraterrestrial_irradiance(day_of_year);
        let am = relative_airmass(position.zenith_deg) * pressure_at_altitude(h) / 101_325.0;

        let fh1 = (-h / 8000.0).exp();
        let fh2 = (-h / 1250.0).exp();
        let cg1 = 5.09e-5 * h + 0.868;
        let cg2 = 3.92e-5 * h + 0.0387;

        let ghi = (cg1 * i0 * cos_z * (-cg2 * am * (fh1 + fh2 * (tl - 1.0))).exp()
            * (0.01 * am.powf(1.8)).exp())
        .max(0.0);

        let b = 0.664 + 0.163 / fh1;
        let bnci = b * (-0.09 * am * (tl - 1.0)).exp() * i0;
        let bnci_2 =
            (ghi * (1.0 - (0.1 - 0.2 * (-tl).exp()) / (0.1 + 0.882 / fh1)) / cos_z).max(0.0);
        let dni = bnci.min(bnci_2).max(0.0);
        let dhi = (ghi - dni * cos_z).max(0.0);

        ClearSky { ghi, dni, dhi }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sun_at(zenith_deg: f64) -> SolarPosition {
        SolarPosition {
            elevation_deg: 90.0 - zenith_deg,
            zenith_deg,
            azimuth_deg: 180.0,
        }
    }

    #[test]
    fn overhead_sun_ghi_is_plausible() {
        let sky = Ineichen::default().components(&sun_at(0.0), 172);
        assert!((900.0..1150.0).contains(&sky.ghi), "ghi {}", sky.ghi);
        assert!(sky.dni > sky.dhi);
    }

    #[test]
    fn components_are_consistent() {
        let sky = Ineichen::default().components(&sun_at(40.0), 80);
        let cos_z = 40f64.to_radians().cos();
        assert!((sky.dhi + sky.dni * cos_z - sky.ghi).abs() < 1e-6 || sky.dhi == 0.0);
    }

    #[test]
    fn below_horizon_is_dark() {
        let sky = Ineichen::default().components(&sun_at(95.0), 80);
        assert_eq!(sky, ClearSky::default());
    }

    #[test]
    fn higher_turbidity_dims_the_beam() {
        let clean = Ineichen::new(2.0, 0.0).components(&sun_at(30.0), 100);
        let hazy = Ineichen::new(5.0, 0.0).components(&sun_at(30.0), 100);
        assert!(hazy.dni < clean.dni);
        assert!(hazy.ghi < clean.ghi);
    }

    #[test]
    fn airmass_grows_toward_horizon() {
        assert!((relative_airmass(0.0) - 1.0).abs() < 0.01);
        assert!(relative_airmass(80.0) > 5.0);
    }

    #[test]
    fn sea_level_pressure() {
        assert!((pressure_at_altitude(0.0) - 101_325.0).abs() < 200.0);
        assert!(pressure_at_altitude(1500.0) < pressure_at_altitude(0.0));
    }
}
