use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::domain::risk::RiskLevel;
use crate::domain::snapshot::ProjectSnapshot;
use crate::domain::validation::ValidationError;
use crate::services::cancellation::CancellationToken;
use crate::services::engine_config::SimulationConfig;
use crate::services::factor_sampler::{ClippedNormalSampler, FactorSampler};
use crate::services::forecast_error::ForecastError;
use crate::services::monte_carlo::{SeedPlan, SeedStream, SimulationRun, run_with_retry};
use crate::services::percentiles::{fraction_where, spread_sorted};
use crate::services::simulation_types::ScheduleForecast;

/// Completion forecast plus the simulated completion days it was built from.
pub fn simulate_schedule(
    snapshot: &ProjectSnapshot,
    spi: f64,
    config: &SimulationConfig,
    seed: u64,
    cancel: &CancellationToken,
) -> Result<(ScheduleForecast, SimulationRun), ForecastError> {
    config.validate()?;
    let remaining = snapshot.remaining_days();
    if remaining < 0 {
        return Err(ValidationError::ElapsedExceedsDuration {
            elapsed: snapshot.elapsed_days(),
            duration: snapshot.project_duration_days(),
        }
        .into());
    }
    let sampler =
        ClippedNormalSampler::new(spi, config.schedule_std_dev_multiplier, config.min_factor)?;
    simulate_schedule_with_sampler(
        snapshot,
        &sampler,
        config.iterations,
        SeedPlan::new(seed, SeedStream::Schedule),
        cancel,
    )
}

pub fn forecast_schedule(
    snapshot: &ProjectSnapshot,
    spi: f64,
    config: &SimulationConfig,
    seed: u64,
    cancel: &CancellationToken,
) -> Result<ScheduleForecast, ForecastError> {
    simulate_schedule(snapshot, spi, config, seed, cancel).map(|(forecast, _)| forecast)
}

pub(crate) fn simulate_schedule_with_sampler<S: FactorSampler + Sync>(
    snapshot: &ProjectSnapshot,
    sampler: &S,
    iterations: usize,
    seeds: SeedPlan,
    cancel: &CancellationToken,
) -> Result<(ScheduleForecast, SimulationRun), ForecastError> {
    let elapsed = snapshot.elapsed_days() as f64;
    let remaining = snapshot.remaining_days() as f64;
    let duration = snapshot.project_duration_days() as f64;

    let run = run_with_retry(
        iterations,
        seeds,
        sampler,
        |factor| elapsed + remaining / factor,
        cancel,
    )?;

    let completion_days = spread_sorted(&run.samples);
    let delay_days = completion_days.p50 - duration;
    let probability_on_time = fraction_where(&run.samples, |days| days <= duration);
    let risk_level = RiskLevel::from_probability(probability_on_time);
    debug!(
        project = snapshot.project_name(),
        delay_days,
        probability_on_time,
        "schedule simulation aggregated"
    );

    let forecast = ScheduleForecast {
        original_end_date: snapshot.planned_end_date(),
        forecasted_end_date: shift_date(snapshot.planned_end_date(), delay_days),
        delay_days,
        probability_on_time,
        risk_level,
        recommendations: schedule_recommendations(risk_level),
        completion_days,
        iterations: run.iterations,
        discarded_iterations: run.discarded,
    };
    Ok((forecast, run))
}

/// Moves `date` by `days` rounded up to whole days, saturating at the
/// calendar limits.
fn shift_date(date: NaiveDate, days: f64) -> NaiveDate {
    let whole_days = days.ceil();
    if whole_days >= 0.0 {
        date.checked_add_days(Days::new(whole_days as u64))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(whole_days.abs() as u64))
            .unwrap_or(NaiveDate::MIN)
    }
}

pub fn schedule_recommendations(risk_level: RiskLevel) -> Vec<String> {
    let templates: &[&str] = match risk_level {
        RiskLevel::Critical => &[
            "Escalate schedule recovery to project leadership immediately",
            "Re-baseline the critical path and resequence remaining work packages",
            "Add crews or extend shifts on activities driving the delay",
        ],
        RiskLevel::High => &[
            "Review critical-path activities for recovery opportunities",
            "Increase progress reporting to a weekly cadence",
            "Evaluate overtime or additional crews for lagging trades",
        ],
        RiskLevel::Medium => &[
            "Track schedule performance against the baseline every reporting period",
            "Confirm look-ahead activities have labour and materials secured",
        ],
        RiskLevel::Low => &[
            "Maintain the current execution plan",
            "Continue routine schedule monitoring",
        ],
    };
    templates.iter().map(|text| text.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ConstantSampler, build_snapshot, on_date, snapshot_record};

    #[test]
    fn constant_performance_gives_exact_delay() {
        // 200 of 400 days elapsed, 200 remaining at half speed => 600 days.
        let snapshot = build_snapshot(snapshot_record());
        let cancel = CancellationToken::new();
        let (forecast, run) = simulate_schedule_with_sampler(
            &snapshot,
            &ConstantSampler(0.5),
            100,
            SeedPlan::new(1, SeedStream::Schedule),
            &cancel,
        )
        .unwrap();

        assert_eq!(run.samples.len(), 100);
        assert_eq!(forecast.delay_days, 200.0);
        assert_eq!(forecast.probability_on_time, 0.0);
        assert_eq!(forecast.risk_level, RiskLevel::Critical);
        assert_eq!(forecast.original_end_date, on_date(2026, 12, 31));
        assert_eq!(forecast.forecasted_end_date, on_date(2027, 7, 19));
        assert_eq!(forecast.discarded_iterations, 0);
    }

    #[test]
    fn faster_than_planned_finishes_early() {
        let snapshot = build_snapshot(snapshot_record());
        let cancel = CancellationToken::new();
        let (forecast, _) = simulate_schedule_with_sampler(
            &snapshot,
            &ConstantSampler(2.0),
            100,
            SeedPlan::new(1, SeedStream::Schedule),
            &cancel,
        )
        .unwrap();

        assert_eq!(forecast.delay_days, -100.0);
        assert_eq!(forecast.probability_on_time, 1.0);
        assert_eq!(forecast.risk_level, RiskLevel::Low);
        assert_eq!(forecast.forecasted_end_date, on_date(2026, 9, 22));
    }

    #[test]
    fn seeded_forecast_is_reproducible() {
        let snapshot = build_snapshot(snapshot_record());
        let config = SimulationConfig::default();
        let cancel = CancellationToken::new();

        let first = forecast_schedule(&snapshot, 0.9, &config, 99, &cancel).unwrap();
        let second = forecast_schedule(&snapshot, 0.9, &config, 99, &cancel).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.iterations, 1000);
        assert!(first.delay_days > 0.0);
        assert!(first.probability_on_time < 0.5);
    }

    #[test]
    fn on_track_project_is_low_risk() {
        let mut record = snapshot_record();
        record.current_progress = 50.0;
        let snapshot = build_snapshot(record);
        let config = SimulationConfig {
            schedule_std_dev_multiplier: 0.0,
            ..SimulationConfig::default()
        };
        let cancel = CancellationToken::new();

        let forecast = forecast_schedule(&snapshot, 1.0, &config, 5, &cancel).unwrap();

        assert_eq!(forecast.delay_days, 0.0);
        assert_eq!(forecast.probability_on_time, 1.0);
        assert_eq!(forecast.risk_level, RiskLevel::Low);
        assert_eq!(forecast.recommendations, schedule_recommendations(RiskLevel::Low));
    }

    #[test]
    fn overrun_snapshot_is_rejected() {
        let mut record = snapshot_record();
        record.elapsed_days = 401;
        let snapshot = build_snapshot(record);
        let cancel = CancellationToken::new();

        let result = forecast_schedule(&snapshot, 1.0, &SimulationConfig::default(), 1, &cancel);
        assert_eq!(
            result,
            Err(ForecastError::Validation(
                ValidationError::ElapsedExceedsDuration {
                    elapsed: 401,
                    duration: 400
                }
            ))
        );
    }

    #[test]
    fn too_few_iterations_are_rejected() {
        let snapshot = build_snapshot(snapshot_record());
        let config = SimulationConfig {
            iterations: 50,
            ..SimulationConfig::default()
        };
        let cancel = CancellationToken::new();
        let result = forecast_schedule(&snapshot, 1.0, &config, 1, &cancel);
        assert!(matches!(
            result,
            Err(ForecastError::Validation(
                ValidationError::IterationsOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn every_tier_has_recommendations() {
        for level in [
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::Critical,
        ] {
            assert!(!schedule_recommendations(level).is_empty());
        }
    }
}
