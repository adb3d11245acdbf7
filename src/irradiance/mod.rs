pub mod clearsky;
pub mod solar_position;

use chrono::{DateTime, Datelike, Utc};

use crate::site::{PanelConfig, Site};

pub use clearsky::{ClearSky, Ineichen};
pub use solar_position::{SolarPosition, solar_position};

/// Ground reflectance used for the reflected component.
pub const DEFAULT_ALBEDO: f64 = 0.2;

/// Sun position together with the horizontal-plane irradiance components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyState {
    pub position: SolarPosition,
    pub irradiance: ClearSky,
}

/// Source of hourly horizontal irradiance for a site.
///
/// The simulator is generic over this trait so alternative clear-sky or
/// measured-irradiance models can be swapped in.
pub trait IrradianceModel {
    fn sky(&self, site: &Site, at: DateTime<Utc>) -> SkyState;
}

impl IrradianceModel for Ineichen {
    fn sky(&self, site: &Site, at: DateTime<Utc>) -> SkyState {
        let position = solar_position(site.latitude, site.longitude, at);
        SkyState {
            position,
            irradiance: self.components(&position, at.ordinal()),
        }
    }
}

/// Plane-of-array irradiance split by component (W/m²).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoaIrradiance {
    pub beam: f64,
    pub sky_diffuse: f64,
    pub ground_reflected: f64,
}

impl PoaIrradiance {
    pub fn total(&self) -> f64 {
        self.beam + self.sky_diffuse + self.ground_reflected
    }
}

/// Cosine of the angle of incidence between the sun and the panel normal.
pub fn incidence_cosine(position: &SolarPosition, panel: &PanelConfig) -> f64 {
    let zenith = position.zenith_deg.to_radians();
    let tilt = panel.tilt_deg.to_radians();
    let delta_az = (position.azimuth_deg - panel.azimuth_deg).to_radians();
    zenith.cos() * tilt.cos() + zenith.sin() * tilt.sin() * delta_az.cos()
}

/// Transposes horizontal irradiance onto a tilted plane (isotropic sky).
///
/// Negative inputs are treated as zero, so the result is never negative.
pub fn plane_of_array(sky: &SkyState, panel: &PanelConfig, albedo: f64) -> PoaIrradiance {
    let ClearSky { ghi, dni, dhi } = sky.irradiance;
    let (ghi, dni, dhi) = (ghi.max(0.0), dni.max(0.0), dhi.max(0.0));
    let cos_tilt = panel.tilt_deg.to_radians().cos();
    let cos_aoi = if sky.position.is_up() {
        incidence_cosine(&sky.position, panel).max(0.0)
    } else {
        0.0
    };
    PoaIrradiance {
        beam: dni * cos_aoi,
        sky_diffuse: dhi * (1.0 + cos_tilt) / 2.0,
        ground_reflected: ghi * albedo.max(0.0) * (1.0 - cos_tilt) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn delhi() -> Site {
        Site::with_timezone_name(28.6139, 77.2090, "Asia/Kolkata")
            .unwrap_or_else(|e| panic!("{e}"))
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 7, 0, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn horizontal_panel_sees_global_horizontal() {
        let sky = Ineichen::default().sky(&delhi(), noon());
        let poa = plane_of_array(&sky, &PanelConfig::new(0.0, 180.0), DEFAULT_ALBEDO);
        assert!((poa.total() - sky.irradiance.ghi).abs() < 1e-6);
        assert_eq!(poa.ground_reflected, 0.0);
    }

    #[test]
    fn south_tilt_beats_north_tilt_in_northern_hemisphere() {
        let sky = Ineichen::default().sky(&delhi(), noon());
        let south = plane_of_array(&sky, &PanelConfig::new(30.0, 180.0), DEFAULT_ALBEDO);
        let north = plane_of_array(&sky, &PanelConfig::new(30.0, 0.0), DEFAULT_ALBEDO);
        assert!(south.total() > north.total());
    }

    #[test]
    fn negative_components_are_clamped() {
        let sky = SkyState {
            position: SolarPosition {
                elevation_deg: 30.0,
                zenith_deg: 60.0,
                azimuth_deg: 180.0,
            },
            irradiance: ClearSky {
                ghi: -5.0,
                dni: -1.0,
                dhi: -2.0,
            },
        };
        let poa = plane_of_array(&sky, &PanelConfig::new(20.0, 180.0), DEFAULT_ALBEDO);
        assert_eq!(poa.total(), 0.0);
    }

    #[test]
    fn night_is_dark() {
        let midnight = Utc
            .with_ymd_and_hms(2024, 3, 20, 19, 0, 0)
            .single()
            .unwrap_or_default();
        let sky = Ineichen::default().sky(&delhi(), midnight);
        let poa = plane_of_array(&sky, &PanelConfig::new(20.0, 180.0), DEFAULT_ALBEDO);
        assert_eq!(poa.total(), 0.0);
    }
}
