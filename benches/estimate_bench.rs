use std::hint::black_box;

use chrono::{TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use rooftop_pv_estimator::config::EstimateConfig;
use rooftop_pv_estimator::estimate::run_estimate;
use rooftop_pv_estimator::irradiance::{Ineichen, solar_position};
use rooftop_pv_estimator::weather::NoWeather;

fn bench_sky_model(c: &mut Criterion) {
    let model = Ineichen::default();
    let noon = Utc.with_ymd_and_hms(2024, 6, 21, 6, 30, 0).unwrap();

    c.bench_function("solar_position_and_clearsky", |b| {
        b.iter(|| {
            let position = solar_position(black_box(28.6139), black_box(77.2090), noon);
            model.components(&position, 173)
        })
    });
}

fn bench_estimate(c: &mut Criterion) {
    let baseline = EstimateConfig::baseline();
    let mut sweep = EstimateConfig::baseline();
    sweep.panel.optimize_tilt = true;

    // 8760 hours, real and clear-sky passes
    c.bench_function("estimate_1year_baseline", |b| {
        b.iter(|| run_estimate(black_box(&baseline), &NoWeather).unwrap())
    });

    c.bench_function("estimate_1year_tilt_sweep", |b| {
        b.iter(|| run_estimate(black_box(&sweep), &NoWeather).unwrap())
    });
}

criterion_group!(benches, bench_sky_model, bench_estimate);
criterion_main!(benches);
