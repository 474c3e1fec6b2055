use serde::Serialize;

use crate::commands::command_error::{CommandError, write_output};
use crate::commands::load_config;
use crate::commands::report_format::format_forecast_report;
use crate::domain::anomaly::AnomalyReport;
use crate::services::anomaly_detection::detect_anomalies;
use crate::services::cancellation::CancellationToken;
use crate::services::histogram::{HistogramLabels, write_histogram_png};
use crate::services::project_forecast::simulate_project;
use crate::services::simulation_types::ProjectForecast;
use crate::services::snapshot_file::{load_observations_from_file, load_snapshot_from_file};

#[derive(Serialize)]
struct ForecastDocument {
    forecast: ProjectForecast,
    anomalies: Option<AnomalyReport>,
}

pub struct ForecastArgs {
    pub input: String,
    pub output: String,
    pub config: Option<String>,
    pub observations: Option<String>,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub histogram: Option<String>,
}

pub fn forecast_command(args: ForecastArgs) -> Result<(), CommandError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(iterations) = args.iterations {
        config.simulation.iterations = iterations;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }

    let snapshot = load_snapshot_from_file(&args.input)?;
    let anomalies = match args.observations.as_deref() {
        Some(path) => {
            let observations = load_observations_from_file(path)?;
            Some(detect_anomalies(&observations, &config.anomaly)?)
        }
        None => None,
    };

    let output = simulate_project(
        &snapshot,
        anomalies.as_ref(),
        &config,
        &CancellationToken::new(),
    )?;

    if let Some(path) = args.histogram.as_deref() {
        let labels = HistogramLabels {
            caption: "Forecasted Completion",
            x_desc: "Project day",
        };
        write_histogram_png(path, &output.schedule_samples, labels)?;
    }

    let document = ForecastDocument {
        forecast: output.report,
        anomalies,
    };
    let yaml = serde_yaml::to_string(&document)?;
    write_output(&args.output, yaml)?;

    println!("{}", format_forecast_report(&document.forecast));
    println!("Forecast written to {}", args.output);
    if let Some(path) = args.histogram {
        println!("Completion histogram written to {path}");
    }
    Ok(())
}
