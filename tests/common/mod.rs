//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rooftop_pv_estimator::config::EstimateConfig;
use rooftop_pv_estimator::site::Site;
use rooftop_pv_estimator::weather::{StaticWeather, Timeline, WeatherSample};

/// Baseline configuration: 20 m² south-facing roof in New Delhi at 20° tilt.
pub fn baseline_config() -> EstimateConfig {
    EstimateConfig::baseline()
}

/// Baseline configuration with a different roof area.
pub fn config_with_area(area_m2: f64) -> EstimateConfig {
    let mut cfg = EstimateConfig::baseline();
    cfg.roof.set_area(area_m2);
    cfg
}

/// New Delhi site.
pub fn delhi() -> Site {
    Site::with_timezone_name(28.6139, 77.2090, "Asia/Kolkata").expect("valid site")
}

/// 2024 timeline in India Standard Time.
pub fn delhi_timeline() -> Timeline {
    Timeline::representative_year(2024, delhi().timezone).expect("valid year")
}

/// Weather provider returning the same conditions for every hour of 2024.
pub fn constant_weather(temp_air_c: f64, wind_speed_m_s: f64) -> StaticWeather {
    let samples = delhi_timeline()
        .hours()
        .iter()
        .map(|t| WeatherSample {
            time: t.local,
            temp_air_c: Some(temp_air_c),
            wind_speed_m_s: Some(wind_speed_m_s),
        })
        .collect();
    StaticWeather::new(samples)
}

/// Weather provider with a daily temperature cycle observed only every
/// sixth hour; wind is never reported.
pub fn sparse_weather() -> StaticWeather {
    let samples = delhi_timeline()
        .hours()
        .iter()
        .step_by(6)
        .enumerate()
        .map(|(i, t)| WeatherSample {
            time: t.local,
            temp_air_c: Some(if i % 4 == 2 { 36.0 } else { 24.0 }),
            wind_speed_m_s: None,
        })
        .collect();
    StaticWeather::new(samples)
}
