pub mod csv_file;
pub mod errors;
#[cfg(feature = "open-meteo")]
pub mod open_meteo;
pub mod timeline;

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{info, warn};
use serde::Serialize;

use crate::config::WeatherConfig;
use crate::site::Site;

pub use csv_file::CsvWeather;
pub use errors::WeatherError;
pub use timeline::{HOURS_PER_YEAR, Timeline, Timestamp};

/// Air temperature assumed when no observation is available (°C).
pub const FALLBACK_TEMP_AIR_C: f64 = 25.0;
/// Wind speed assumed when no observation is available (m/s).
pub const FALLBACK_WIND_SPEED_M_S: f64 = 1.0;

/// One hourly observation in site-local time. Missing values are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub time: NaiveDateTime,
    pub temp_air_c: Option<f64>,
    pub wind_speed_m_s: Option<f64>,
}

/// A source of hourly weather observations.
pub trait WeatherProvider {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns observations covering the local dates `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns a [`WeatherError`] if the source cannot be reached or decoded.
    fn fetch(
        &self,
        site: &Site,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WeatherSample>, WeatherError>;
}

/// Provider that never has data; every hour uses the fallback conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWeather;

impl WeatherProvider for NoWeather {
    fn name(&self) -> &'static str {
        "none"
    }

    fn fetch(&self, _: &Site, _: NaiveDate, _: NaiveDate) -> Result<Vec<WeatherSample>, WeatherError> {
        Ok(Vec::new())
    }
}

/// Provider backed by samples already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticWeather {
    samples: Vec<WeatherSample>,
}

impl StaticWeather {
    pub fn new(samples: Vec<WeatherSample>) -> Self {
        Self { samples }
    }
}

impl WeatherProvider for StaticWeather {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch(&self, _: &Site, _: NaiveDate, _: NaiveDate) -> Result<Vec<WeatherSample>, WeatherError> {
        Ok(self.samples.clone())
    }
}

/// Conditions substituted for hours without any usable observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackWeather {
    pub temp_air_c: f64,
    pub wind_speed_m_s: f64,
}

impl Default for FallbackWeather {
    fn default() -> Self {
        Self {
            temp_air_c: FALLBACK_TEMP_AIR_C,
            wind_speed_m_s: FALLBACK_WIND_SPEED_M_S,
        }
    }
}

/// How much of the aligned series came from real observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCoverage {
    /// Every hour of both variables was observed.
    Observed,
    /// Some hours were interpolated or edge-filled.
    Filled,
    /// No observations; fallback constants throughout.
    Fallback,
}

/// Temperature and wind aligned one-to-one with a [`Timeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSeries {
    pub temp_air_c: Vec<f64>,
    pub wind_speed_m_s: Vec<f64>,
    pub coverage: WeatherCoverage,
    fallback: FallbackWeather,
}

impl WeatherSeries {
    /// A series holding the fallback conditions for every hour.
    pub fn constant(len: usize, fallback: FallbackWeather) -> Self {
        Self {
            temp_air_c: vec![fallback.temp_air_c; len],
            wind_speed_m_s: vec![fallback.wind_speed_m_s; len],
            coverage: WeatherCoverage::Fallback,
            fallback,
        }
    }

    /// Aligns raw samples onto the timeline.
    ///
    /// Samples are matched on local month, day and hour, so a typical-year
    /// file recorded in another year still applies. Interior gaps are
    /// interpolated linearly, leading and trailing gaps take the nearest
    /// observation, and a variable with no observations at all uses the
    /// fallback constant.
    pub fn align(timeline: &Timeline, samples: &[WeatherSample], fallback: FallbackWeather) -> Self {
        let mut by_hour: HashMap<(u32, u32, u32), &WeatherSample> = HashMap::with_capacity(samples.len());
        for s in samples {
            by_hour.insert(hour_key(&s.time), s);
        }
        let (raw_temp, raw_wind): (Vec<_>, Vec<_>) = timeline
            .hours()
            .iter()
            .map(|t| match by_hour.get(&hour_key(&t.local)) {
                Some(s) => (s.temp_air_c, s.wind_speed_m_s),
                None => (None, None),
            })
            .unzip();

        let (temp_air_c, temp_cov) = fill_gaps(&raw_temp, fallback.temp_air_c);
        let (wind_speed_m_s, wind_cov) = fill_gaps(&raw_wind, fallback.wind_speed_m_s);
        let coverage = match (temp_cov, wind_cov) {
            (WeatherCoverage::Observed, WeatherCoverage::Observed) => WeatherCoverage::Observed,
            (WeatherCoverage::Fallback, WeatherCoverage::Fallback) => WeatherCoverage::Fallback,
            _ => WeatherCoverage::Filled,
        };
        Self {
            temp_air_c,
            wind_speed_m_s,
            coverage,
            fallback,
        }
    }

    /// `(temp_air_c, wind_speed_m_s)` for hour `index`.
    pub fn at(&self, index: usize) -> (f64, f64) {
        (
            self.temp_air_c
                .get(index)
                .copied()
                .unwrap_or(self.fallback.temp_air_c),
            self.wind_speed_m_s
                .get(index)
                .copied()
                .unwrap_or(self.fallback.wind_speed_m_s),
        )
    }

    pub fn len(&self) -> usize {
        self.temp_air_c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temp_air_c.is_empty()
    }
}

fn hour_key(t: &NaiveDateTime) -> (u32, u32, u32) {
    (t.month(), t.day(), t.hour())
}

fn fill_gaps(raw: &[Option<f64>], fallback: f64) -> (Vec<f64>, WeatherCoverage) {
    let known: Vec<(usize, f64)> = raw
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|x| (i, x)))
        .collect();
    let (Some(&(_, first_v)), Some(&(last_i, last_v))) = (known.first(), known.last()) else {
        return (vec![fallback; raw.len()], WeatherCoverage::Fallback);
    };

    let mut out = vec![first_v; raw.len()];
    for pair in known.windows(2) {
        let (i0, v0) = pair[0];
        let (i1, v1) = pair[1];
        let span = (i1 - i0) as f64;
        for (offset, slot) in out[i0..i1].iter_mut().enumerate() {
            *slot = v0 + (v1 - v0) * offset as f64 / span;
        }
    }
    out[last_i..].fill(last_v);

    let coverage = if known.len() == raw.len() {
        WeatherCoverage::Observed
    } else {
        WeatherCoverage::Filled
    };
    (out, coverage)
}

/// Fetches and aligns weather for a timeline, never failing.
///
/// A provider error is logged and replaced by the fallback conditions.
pub fn load_weather(
    provider: &dyn WeatherProvider,
    site: &Site,
    timeline: &Timeline,
    fallback: FallbackWeather,
) -> WeatherSeries {
    let (Some(start), Some(end)) = (timeline.first_day(), timeline.last_day()) else {
        return WeatherSeries::constant(0, fallback);
    };
    match provider.fetch(site, start, end) {
        Ok(samples) => {
            let series = WeatherSeries::align(timeline, &samples, fallback);
            match series.coverage {
                WeatherCoverage::Fallback if provider.name() != NoWeather.name() => warn!(
                    "weather source `{}` returned no usable hours; assuming {:.1} °C and {:.1} m/s",
                    provider.name(),
                    fallback.temp_air_c,
                    fallback.wind_speed_m_s
                ),
                coverage => info!(
                    "weather source `{}`: {} samples, coverage {:?}",
                    provider.name(),
                    samples.len(),
                    coverage
                ),
            }
            series
        }
        Err(e) => {
            warn!(
                "weather source `{}` unavailable ({e}); assuming {:.1} °C and {:.1} m/s",
                provider.name(),
                fallback.temp_air_c,
                fallback.wind_speed_m_s
            );
            WeatherSeries::constant(timeline.len(), fallback)
        }
    }
}

/// Builds the provider named by the weather configuration.
///
/// Sources that cannot be constructed degrade to [`NoWeather`] with a warning.
pub fn provider_for(config: &WeatherConfig) -> Box<dyn WeatherProvider> {
    match config.source.as_str() {
        "csv" => match &config.csv_path {
            Some(path) => Box::new(CsvWeather::new(path)),
            None => {
                warn!("weather.source is \"csv\" but no weather.csv_path is set");
                Box::new(NoWeather)
            }
        },
        "open_meteo" => open_meteo_provider(config),
        _ => Box::new(NoWeather),
    }
}

#[cfg(feature = "open-meteo")]
fn open_meteo_provider(config: &WeatherConfig) -> Box<dyn WeatherProvider> {
    let timeout = std::time::Duration::from_secs(config.timeout_secs);
    match open_meteo::OpenMeteo::new(timeout) {
        Ok(provider) => Box::new(provider),
        Err(e) => {
            warn!("cannot create Open-Meteo client: {e}");
            Box::new(NoWeather)
        }
    }
}

#[cfg(not(feature = "open-meteo"))]
fn open_meteo_provider(_: &WeatherConfig) -> Box<dyn WeatherProvider> {
    warn!("built without the `open-meteo` feature; using fallback weather");
    Box::new(NoWeather)
}
