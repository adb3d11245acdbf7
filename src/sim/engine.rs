//! Hourly generation engine: sky, transposition, temperature, DC and AC.

use crate::irradiance::{IrradianceModel, plane_of_array};
use crate::pv::module::dc_output_w;
use crate::pv::temperature::cell_temperature;
use crate::pv::SystemSpec;
use crate::site::{PanelConfig, Site};
use crate::weather::{Timeline, WeatherSeries};

use super::types::{HourRecord, Simulation};

/// Air temperature of the clear-sky reference run (°C).
pub const CLEAR_SKY_REFERENCE_TEMP_C: f64 = 20.0;
/// Wind speed of the clear-sky reference run (m/s).
pub const CLEAR_SKY_REFERENCE_WIND_M_S: f64 = 0.0;

/// Simulation engine borrowing the site, system, timeline and weather.
///
/// Generic over `M: IrradianceModel` for static dispatch. Each hour is
/// computed twice from the same sky: once with the aligned weather and
/// losses, once at the clear-sky reference conditions without losses.
pub struct Simulator<'a, M: IrradianceModel> {
    site: &'a Site,
    system: &'a SystemSpec,
    panel: PanelConfig,
    model: &'a M,
    timeline: &'a Timeline,
    weather: &'a WeatherSeries,
    albedo: f64,
}

impl<'a, M: IrradianceModel> Simulator<'a, M> {
    /// Creates a new simulator.
    ///
    /// # Arguments
    ///
    /// * `site` - Location and timezone
    /// * `system` - Sized PV system
    /// * `panel` - Tilt and azimuth of the array
    /// * `model` - Clear-sky irradiance source
    /// * `timeline` - Hours to simulate
    /// * `weather` - Temperature and wind aligned with `timeline`
    /// * `albedo` - Ground reflectance
    pub fn new(
        site: &'a Site,
        system: &'a SystemSpec,
        panel: PanelConfig,
        model: &'a M,
        timeline: &'a Timeline,
        weather: &'a WeatherSeries,
        albedo: f64,
    ) -> Self {
        Self {
            site,
            system,
            panel,
            model,
            timeline,
            weather,
            albedo,
        }
    }

    /// Cell temperature, DC and AC power for one irradiance level.
    fn convert(&self, poa: f64, temp_air_c: f64, wind_m_s: f64) -> (f64, f64, f64) {
        let cell = cell_temperature(poa, temp_air_c, wind_m_s, self.system.racking.sapm_params());
        let dc = dc_output_w(
            self.system.dc_capacity_kw() * 1000.0,
            self.system.module.gamma_pdc_per_c,
            poa,
            cell,
        );
        (cell, dc, self.system.ac_output_w(dc))
    }

    /// Simulates hour `t` of the timeline.
    ///
    /// # Panics
    ///
    /// Panics if `t` is outside the timeline.
    pub fn step(&self, t: usize) -> HourRecord {
        let ts = self.timeline.hours()[t];
        let sky = self.model.sky(self.site, ts.utc);
        let poa = plane_of_array(&sky, &self.panel, self.albedo).total();
        let (temp_air_c, wind_speed_m_s) = self.weather.at(t);

        let (cell_temp_c, dc_real_w, ac_raw) = self.convert(poa, temp_air_c, wind_speed_m_s);
        let ac_real_w = (ac_raw * self.system.losses.derate_factor()).max(0.0);
        let (_, _, ac_clear_w) =
            self.convert(poa, CLEAR_SKY_REFERENCE_TEMP_C, CLEAR_SKY_REFERENCE_WIND_M_S);

        HourRecord {
            timestep: t,
            local_time: ts.local,
            solar_elevation_deg: sky.position.elevation_deg,
            ghi_w_m2: sky.irradiance.ghi,
            dni_w_m2: sky.irradiance.dni,
            dhi_w_m2: sky.irradiance.dhi,
            poa_w_m2: poa,
            temp_air_c,
            wind_speed_m_s,
            cell_temp_c,
            dc_real_w,
            ac_real_w,
            ac_clear_w,
        }
    }

    /// Simulates every hour of the timeline.
    pub fn run(&self) -> Simulation {
        let hours: Vec<HourRecord> = (0..self.timeline.len()).map(|t| self.step(t)).collect();
        let poa_sum_wh_m2 = hours.iter().map(|h| h.poa_w_m2).sum();
        Simulation {
            hours,
            poa_sum_wh_m2,
            weather: self.weather.coverage,
        }
    }
}
