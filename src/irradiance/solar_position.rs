//! Solar geometry from UTC time and site coordinates.
//!
//! Declination and the equation of time use Spencer's Fourier series;
//! accuracy is well within what an hourly energy estimate needs.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Timelike, Utc};

const DEG: f64 = PI / 180.0;

/// Mean total solar irradiance at 1 AU (W/m²).
pub const SOLAR_CONSTANT_W_M2: f64 = 1361.0;

/// Sun position seen from a site at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Elevation above the horizon in degrees; negative at night.
    pub elevation_deg: f64,
    /// Zenith angle in degrees (`90 - elevation`).
    pub zenith_deg: f64,
    /// Azimuth in degrees clockwise from north.
    pub azimuth_deg: f64,
}

impl SolarPosition {
    pub fn is_up(&self) -> bool {
        self.elevation_deg > 0.0
    }
}

fn day_angle(day_of_year: u32) -> f64 {
    2.0 * PI * (f64::from(day_of_year) - 1.0) / 365.0
}

/// Solar declination in degrees.
pub fn declination_deg(day_of_year: u32) -> f64 {
    let b = day_angle(day_of_year);
    let rad = 0.006918 - 0.399912 * b.cos() + 0.070257 * b.sin() - 0.006758 * (2.0 * b).cos()
        + 0.000907 * (2.0 * b).sin()
        - 0.002697 * (3.0 * b).cos()
        + 0.00148 * (3.0 * b).sin();
    rad / DEG
}

/// Equation of time in minutes.
pub fn equation_of_time_min(day_of_year: u32) -> f64 {
    let b = day_angle(day_of_year);
    229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

/// Extraterrestrial normal irradiance corrected for Earth-Sun distance (W/m²).
pub fn extraterrestrial_irradiance(day_of_year: u32) -> f64 {
    let b = day_angle(day_of_year);
    SOLAR_CONSTANT_W_M2
        * (1.00011 + 0.034221 * b.cos() + 0.00128 * b.sin() + 0.000719 * (2.0 * b).cos()
            + 0.000077 * (2.0 * b).sin())
}

/// Computes the sun position for a site at a UTC instant.
///
/// # Arguments
///
/// * `latitude_deg` - Site latitude, positive north
/// * `longitude_deg` - Site longitude, positive east
/// * `at` - Instant in UTC
pub fn solar_position(latitude_deg: f64, longitude_deg: f64, at: DateTime<Utc>) -> SolarPosition {
    let doy = at.ordinal();
    let ut_hours = f64::from(at.hour())
        + f64::from(at.minute()) / 60.0
        + f64::from(at.second()) / 3600.0;
    let solar_time = ut_hours + longitude_deg / 15.0 + equation_of_time_min(doy) / 60.0;
    let hour_angle_deg = (15.0 * (solar_time - 12.0) + 180.0).rem_euclid(360.0) - 180.0;

    let lat = latitude_deg * DEG;
    let decl = declination_deg(doy) * DEG;
    let omega = hour_angle_deg * DEG;

    let sin_elev = (lat.sin() * decl.sin() + lat.cos() * decl.cos() * omega.cos()).clamp(-1.0, 1.0);
    let elev = sin_elev.asin();

    // Azimuth is undefined at the poles and at the zenith; report due south there.
    let denom = elev.cos() * lat.cos();
    let cos_az = if denom.abs() > 1e-9 {
        ((decl.sin() - sin_elev * lat.sin()) / denom).clamp(-1.0, 1.0)
    } else {
        -1.0
    };
    let az = cos_az.acos() / DEG;
    let azimuth_deg = if hour_angle_deg > 0.0 { 360.0 - az } else { az };

    let elevation_deg = elev / DEG;
    SolarPosition {
        elevation_deg,
        zenith_deg: 90.0 - elevation_deg,
        azimuth_deg,
    }
}
