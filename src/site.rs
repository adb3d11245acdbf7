//! Installation site and panel orientation.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

/// Geographic location used for irradiance and weather lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Local civil timezone; defines the representative-year calendar.
    pub timezone: Tz,
}

impl Site {
    /// Creates a site from coordinates and a parsed timezone.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidSite`] for non-finite or out-of-range
    /// coordinates.
    pub fn new(latitude: f64, longitude: f64, timezone: Tz) -> Result<Self, EstimateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(EstimateError::InvalidSite(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(EstimateError::InvalidSite(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            timezone,
        })
    }

    /// Creates a site from coordinates and an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidSite`] if the timezone is unknown or the
    /// coordinates are invalid.
    pub fn with_timezone_name(
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<Self, EstimateError> {
        let tz = parse_timezone(timezone).ok_or_else(|| {
            EstimateError::InvalidSite(format!("unknown timezone \"{timezone}\""))
        })?;
        Self::new(latitude, longitude, tz)
    }
}

/// Parses an IANA timezone name such as `"Asia/Kolkata"`.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

/// Panel orientation: tilt from horizontal, azimuth clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Tilt in degrees, 0 = horizontal, 90 = vertical.
    pub tilt_deg: f64,
    /// Azimuth in degrees, 180 = facing south.
    pub azimuth_deg: f64,
}

impl PanelConfig {
    pub fn new(tilt_deg: f64, azimuth_deg: f64) -> Self {
        Self {
            tilt_deg,
            azimuth_deg,
        }
    }
}
