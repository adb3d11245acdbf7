//! Hourly temperature and wind from the Open-Meteo historical archive.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::csv_file::parse_local_time;
use super::{WeatherError, WeatherProvider, WeatherSample};
use crate::site::Site;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

/// Open-Meteo archive client
///
pub struct OpenMeteo {
    client: Client,
    base_url: String,
}

impl OpenMeteo {
    /// Returns a new client
    ///
    /// # Arguments
    ///
    /// * 'timeout' - per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: ARCHIVE_URL.to_string(),
        })
    }

    /// Points the client at another archive-compatible endpoint.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

impl WeatherProvider for OpenMeteo {
    fn name(&self) -> &'static str {
        "open_meteo"
    }

    fn fetch(
        &self,
        site: &Site,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WeatherSample>, WeatherError> {
        let req = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", site.latitude.to_string()),
                ("longitude", site.longitude.to_string()),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                ("hourly", "temperature_2m,wind_speed_10m".to_string()),
                ("wind_speed_unit", "ms".to_string()),
                ("timezone", site.timezone.name().to_string()),
            ])
            .send()?;

        let status = req.status();
        if !status.is_success() {
            return Err(WeatherError(format!("{:?}", status)));
        }

        let json = req.text()?;
        parse_archive(&json)
    }
}

/// Decodes an archive response body into samples.
///
/// # Errors
///
/// Returns a [`WeatherError`] on malformed JSON or timestamps.
pub fn parse_archive(json: &str) -> Result<Vec<WeatherSample>, WeatherError> {
    let body: ArchiveResponse = serde_json::from_str(json)?;
    let HourlyBlock {
        time,
        temperature_2m,
        wind_speed_10m,
    } = body.hourly;
    time.iter()
        .enumerate()
        .map(|(i, t)| -> Result<WeatherSample, WeatherError> {
            Ok(WeatherSample {
                time: parse_local_time(t)?,
                temp_air_c: temperature_2m.get(i).copied().flatten(),
                wind_speed_m_s: wind_speed_10m.get(i).copied().flatten(),
            })
        })
        .collect()
}
