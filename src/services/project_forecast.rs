use rand::RngCore;
use tracing::info;

use crate::domain::anomaly::AnomalyReport;
use crate::domain::snapshot::ProjectSnapshot;
use crate::services::cancellation::CancellationToken;
use crate::services::cost_forecast::simulate_cost;
use crate::services::engine_config::EngineConfig;
use crate::services::evm_calculation::compute_snapshot_evm;
use crate::services::forecast_error::ForecastError;
use crate::services::health_aggregation::{FindingCounts, assess_health};
use crate::services::schedule_forecast::simulate_schedule;
use crate::services::simulation_types::{ForecastOutput, ProjectForecast};

/// EVM metrics, schedule and cost forecasts and the overall assessment of
/// one snapshot, with no anomaly findings.
pub fn forecast_project(
    snapshot: &ProjectSnapshot,
    config: &EngineConfig,
) -> Result<ProjectForecast, ForecastError> {
    forecast_project_with_findings(snapshot, None, config, &CancellationToken::new())
}

/// Like [`forecast_project`], with critical/high findings from `findings`
/// lowering the health score.
pub fn forecast_project_with_findings(
    snapshot: &ProjectSnapshot,
    findings: Option<&AnomalyReport>,
    config: &EngineConfig,
    cancel: &CancellationToken,
) -> Result<ProjectForecast, ForecastError> {
    simulate_project(snapshot, findings, config, cancel).map(|output| output.report)
}

/// Runs the full pipeline and keeps the simulated samples next to the
/// report.
pub fn simulate_project(
    snapshot: &ProjectSnapshot,
    findings: Option<&AnomalyReport>,
    config: &EngineConfig,
    cancel: &CancellationToken,
) -> Result<ForecastOutput, ForecastError> {
    config.validate()?;
    let evm = compute_snapshot_evm(snapshot)?;
    let seed = config
        .simulation
        .seed
        .unwrap_or_else(|| rand::thread_rng().next_u64());

    let (schedule, cost) = rayon::join(
        || simulate_schedule(snapshot, evm.spi, &config.simulation, seed, cancel),
        || simulate_cost(&evm, &config.simulation, seed, cancel),
    );
    let (schedule_forecast, schedule_run) = schedule?;
    let (cost_forecast, cost_run) = cost?;

    let counts = findings.map(FindingCounts::from_report).unwrap_or_default();
    let overall_assessment = assess_health(
        schedule_forecast.probability_on_time,
        cost_forecast.probability_within_budget,
        counts,
        &config.health,
    );
    info!(
        project = snapshot.project_name(),
        seed,
        health_score = overall_assessment.health_score,
        status = overall_assessment.health_status.as_str(),
        "project forecast complete"
    );

    Ok(ForecastOutput {
        report: ProjectForecast {
            project_name: snapshot.project_name().to_string(),
            seed,
            evm_metrics: evm,
            schedule_forecast,
            cost_forecast,
            overall_assessment,
        },
        schedule_samples: schedule_run.samples,
        cost_samples: cost_run.samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::anomaly::Observation;
    use crate::domain::validation::ValidationError;
    use crate::services::anomaly_detection::{RISK_SCORE_FIELD, detect_anomalies};
    use crate::services::engine_config::AnomalyThresholds;
    use crate::services::monte_carlo::SimulationError;
    use crate::services::simulation_types::HealthStatus;
    use crate::test_support::{build_snapshot, seeded_config, snapshot_record};

    #[test]
    fn seeded_forecast_is_deterministic() {
        let snapshot = build_snapshot(snapshot_record());
        let config = seeded_config(4242);

        let first = forecast_project(&snapshot, &config).unwrap();
        let second = forecast_project(&snapshot, &config).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.seed, 4242);
        assert_eq!(first.project_name, "Harbour Bridge");
        assert!((first.evm_metrics.spi - 0.9).abs() < 1e-12);
    }

    #[test]
    fn unseeded_forecast_reports_the_seed_it_used() {
        let snapshot = build_snapshot(snapshot_record());
        let forecast = forecast_project(&snapshot, &EngineConfig::default()).unwrap();

        let replay = forecast_project(&snapshot, &seeded_config(forecast.seed)).unwrap();
        assert_eq!(forecast, replay);
    }

    #[test]
    fn lagging_project_is_not_healthy() {
        let snapshot = build_snapshot(snapshot_record());
        let forecast = forecast_project(&snapshot, &seeded_config(7)).unwrap();

        assert!(forecast.schedule_forecast.delay_days > 0.0);
        assert!(forecast.cost_forecast.variance_percent > 0.0);
        assert_ne!(
            forecast.overall_assessment.health_status,
            HealthStatus::Healthy
        );
    }

    #[test]
    fn findings_lower_the_health_score() {
        let mut record = snapshot_record();
        record.current_progress = 60.0;
        record.actual_cost = 400_000.0;
        let snapshot = build_snapshot(record);
        let config = seeded_config(11);
        let findings = detect_anomalies(
            &[
                Observation::new().with_number(RISK_SCORE_FIELD, 0.95),
                Observation::new().with_number(RISK_SCORE_FIELD, 0.8),
            ],
            &AnomalyThresholds::default(),
        )
        .unwrap();
        let cancel = CancellationToken::new();

        let clean = forecast_project(&snapshot, &config).unwrap();
        let flagged =
            forecast_project_with_findings(&snapshot, Some(&findings), &config, &cancel).unwrap();

        assert_eq!(
            clean.overall_assessment.health_score - flagged.overall_assessment.health_score,
            15
        );
        assert_eq!(clean.schedule_forecast, flagged.schedule_forecast);
    }

    #[test]
    fn samples_are_returned_for_both_simulations() {
        let snapshot = build_snapshot(snapshot_record());
        let output = simulate_project(
            &snapshot,
            None,
            &seeded_config(3),
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(output.schedule_samples.len(), 1000);
        assert_eq!(output.cost_samples.len(), 1000);
    }

    #[test]
    fn invalid_config_fails_before_simulating() {
        let snapshot = build_snapshot(snapshot_record());
        let mut config = seeded_config(1);
        config.simulation.iterations = 100_001;

        assert!(matches!(
            forecast_project(&snapshot, &config),
            Err(ForecastError::Validation(
                ValidationError::IterationsOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn cancelled_forecast_returns_simulation_error() {
        let snapshot = build_snapshot(snapshot_record());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = forecast_project_with_findings(&snapshot, None, &seeded_config(1), &cancel);
        assert_eq!(
            result,
            Err(ForecastError::Simulation(SimulationError::Cancelled))
        );
    }
}
