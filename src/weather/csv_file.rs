//! Weather observations from a local CSV file.
//!
//! Expected columns: `timestamp,temp_air,wind_speed`, with timestamps in
//! site-local time and empty cells for missing values.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::{WeatherError, WeatherProvider, WeatherSample};
use crate::site::Site;

const TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Deserialize)]
struct Row {
    timestamp: String,
    temp_air: Option<f64>,
    wind_speed: Option<f64>,
}

/// Provider reading hourly observations from a CSV file on each fetch.
#[derive(Debug, Clone)]
pub struct CsvWeather {
    path: PathBuf,
}

impl CsvWeather {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl WeatherProvider for CsvWeather {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn fetch(&self, _: &Site, _: NaiveDate, _: NaiveDate) -> Result<Vec<WeatherSample>, WeatherError> {
        let file = File::open(&self.path)
            .map_err(|e| WeatherError(format!("cannot open \"{}\": {e}", self.path.display())))?;
        read_weather_csv(file)
    }
}

/// Parses a local timestamp in any of the accepted layouts.
///
/// # Errors
///
/// Returns a [`WeatherError`] naming the offending value.
pub fn parse_local_time(s: &str) -> Result<NaiveDateTime, WeatherError> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| WeatherError(format!("unrecognised timestamp \"{s}\"")))
}

/// Reads weather samples from CSV data.
///
/// # Errors
///
/// Returns a [`WeatherError`] on malformed rows or timestamps.
pub fn read_weather_csv<R: Read>(reader: R) -> Result<Vec<WeatherSample>, WeatherError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut samples = Vec::new();
    for row in rdr.deserialize() {
        let row: Row = row?;
        samples.push(WeatherSample {
            time: parse_local_time(&row.timestamp)?,
            temp_air_c: row.temp_air,
            wind_speed_m_s: row.wind_speed,
        });
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_with_missing_cells() {
        let data = "timestamp,temp_air,wind_speed\n\
                    2024-01-01T00:00,12.5,1.2\n\
                    2024-01-01T01:00,,0.8\n\
                    2024-01-01 02:00:00,11.0,\n";
        let samples = read_weather_csv(data.as_bytes()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].temp_air_c, Some(12.5));
        assert_eq!(samples[1].temp_air_c, None);
        assert_eq!(samples[2].wind_speed_m_s, None);
    }

    #[test]
    fn rejects_bad_timestamp() {
        let data = "timestamp,temp_air,wind_speed\nyesterday,10,1\n";
        let err = read_weather_csv(data.as_bytes());
        assert!(err.is_err());
        assert!(err.err().map(|e| e.0).unwrap_or_default().contains("yesterday"));
    }

    #[test]
    fn rejects_non_numeric_temperature() {
        let data = "timestamp,temp_air,wind_speed\n2024-01-01T00:00,warm,1\n";
        assert!(read_weather_csv(data.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let provider = CsvWeather::new(Path::new("/nonexistent/weather.csv"));
        let site = Site::with_timezone_name(0.0, 0.0, "UTC").unwrap_or_else(|e| panic!("{e}"));
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        assert!(provider.fetch(&site, day, day).is_err());
    }
}
