//! Rooftop PV estimator entry point: CLI wiring and config-driven estimate.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rooftop_pv_estimator::config::EstimateConfig;
use rooftop_pv_estimator::estimate::run_estimate;
use rooftop_pv_estimator::io::export::{
    export_hourly_csv, export_monthly_csv, export_projection_csv,
};
use rooftop_pv_estimator::weather;

/// Rooftop solar generation and payback estimator.
///
/// Without --config or --preset the baseline preset is used.
#[derive(Debug, Parser)]
#[command(name = "rooftop-pv", version)]
struct Cli {
    /// Load the estimate configuration from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (baseline, jaipur_large_roof, chennai_bill)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Usable roof area in m² (replaces any configured sizing source)
    #[arg(long, value_name = "M2")]
    area: Option<f64>,

    /// Panel tilt in degrees from horizontal
    #[arg(long, value_name = "DEG")]
    tilt: Option<f64>,

    /// Panel azimuth in degrees clockwise from north
    #[arg(long, value_name = "DEG")]
    azimuth: Option<f64>,

    /// Sweep tilts 0-45° and report the most productive one
    #[arg(long)]
    optimize_tilt: bool,

    /// Weather source: none, csv or open-meteo
    #[arg(long, value_name = "SOURCE")]
    weather: Option<String>,

    /// CSV file with timestamp,temp_air,wind_speed columns (implies --weather csv)
    #[arg(long, value_name = "PATH")]
    weather_csv: Option<PathBuf>,

    /// Write hourly records to CSV
    #[arg(long, value_name = "PATH")]
    hourly_out: Option<PathBuf>,

    /// Write monthly totals to CSV
    #[arg(long, value_name = "PATH")]
    monthly_out: Option<PathBuf>,

    /// Write the savings projection to CSV
    #[arg(long, value_name = "PATH")]
    projection_out: Option<PathBuf>,

    /// Print the estimate as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Start the REST API after the estimate completes
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn load_config(cli: &Cli) -> Result<EstimateConfig> {
    let mut config = if let Some(path) = &cli.config {
        EstimateConfig::from_toml_file(path)?
    } else if let Some(name) = &cli.preset {
        EstimateConfig::from_preset(name)?
    } else {
        EstimateConfig::baseline()
    };

    if let Some(area) = cli.area {
        config.roof.set_area(area);
    }
    if let Some(tilt) = cli.tilt {
        config.panel.tilt_deg = tilt;
    }
    if let Some(azimuth) = cli.azimuth {
        config.panel.azimuth_deg = azimuth;
    }
    if cli.optimize_tilt {
        config.panel.optimize_tilt = true;
    }
    if let Some(source) = &cli.weather {
        config.weather.source = source.replace('-', "_");
    }
    if let Some(path) = &cli.weather_csv {
        config.weather.source = "csv".to_string();
        config.weather.csv_path = Some(path.clone());
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let provider = weather::provider_for(&config.weather);
    let estimate = run_estimate(&config, provider.as_ref()).context("estimate failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("{estimate}");
    }

    if let Some(path) = &cli.hourly_out {
        export_hourly_csv(&estimate.hours, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("hourly records written to {}", path.display());
    }
    if let Some(path) = &cli.monthly_out {
        export_monthly_csv(&estimate.monthly_series(), path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("monthly totals written to {}", path.display());
    }
    if let Some(path) = &cli.projection_out {
        export_projection_csv(&estimate.financial.projection, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("projection written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(rooftop_pv_estimator::api::AppState { config, estimate });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(rooftop_pv_estimator::api::serve(state, addr))
            .context("API server failed")?;
    }

    Ok(())
}
