use std::cmp::Reverse;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::anomaly::{
    AnomalyFinding, AnomalyReport, Dimension, Observation, ObservationValue,
};
use crate::domain::validation::ValidationError;
use crate::services::engine_config::{AnomalyThresholds, SeverityBands};

pub const RISK_SCORE_FIELD: &str = "risk_score";
pub const PROGRESS_FIELD: &str = "progress_percent";
pub const EXPECTED_PROGRESS_FIELD: &str = "expected_progress_percent";
pub const COST_VARIANCE_FIELD: &str = "cost_variance_percent";
pub const DEFECT_RATE_FIELD: &str = "defect_rate_percent";

#[derive(Debug, Clone, PartialEq)]
enum RuleOutcome {
    /// None of the rule's fields are present on the record.
    NotApplicable,
    /// Fields are partially present or not usable numbers.
    Skipped,
    Evaluated(Option<AnomalyFinding>),
}

#[derive(Debug, Default)]
struct RecordEvaluation {
    findings: Vec<AnomalyFinding>,
    evaluated: usize,
    skipped: usize,
}

/// Evaluates every record against the schedule, cost, safety and quality
/// rules and returns the findings ordered by severity (highest first), then
/// by position in `observations`.
pub fn detect_anomalies(
    observations: &[Observation],
    thresholds: &AnomalyThresholds,
) -> Result<AnomalyReport, ValidationError> {
    thresholds.validate()?;

    let evaluations: Vec<RecordEvaluation> = observations
        .par_iter()
        .enumerate()
        .map(|(index, record)| evaluate_record(index, record, thresholds))
        .collect();

    let mut report = AnomalyReport {
        record_count: observations.len(),
        ..AnomalyReport::default()
    };
    for evaluation in evaluations {
        report.evaluated_count += evaluation.evaluated;
        report.skipped_count += evaluation.skipped;
        report.findings.extend(evaluation.findings);
    }
    report.findings.sort_by_key(|finding| {
        (
            Reverse(finding.severity),
            finding.source_index,
            finding.dimension,
        )
    });

    if report.skipped_count > 0 {
        warn!(
            skipped = report.skipped_count,
            records = report.record_count,
            "anomaly rules skipped on malformed records"
        );
    }
    info!(
        records = report.record_count,
        findings = report.findings.len(),
        "anomaly detection finished"
    );
    Ok(report)
}

fn evaluate_record(
    index: usize,
    record: &Observation,
    thresholds: &AnomalyThresholds,
) -> RecordEvaluation {
    let mut evaluation = RecordEvaluation::default();
    for dimension in Dimension::ALL {
        match evaluate_rule(dimension, index, record, thresholds) {
            RuleOutcome::NotApplicable => {}
            RuleOutcome::Skipped => evaluation.skipped += 1,
            RuleOutcome::Evaluated(finding) => {
                evaluation.evaluated += 1;
                evaluation.findings.extend(finding);
            }
        }
    }
    evaluation
}

fn evaluate_rule(
    dimension: Dimension,
    index: usize,
    record: &Observation,
    thresholds: &AnomalyThresholds,
) -> RuleOutcome {
    let fields = rule_fields(dimension);
    if fields.iter().all(|name| !record.contains(name)) {
        return RuleOutcome::NotApplicable;
    }
    let Some(values) = read_numbers(record, fields) else {
        return RuleOutcome::Skipped;
    };
    let observed = match dimension {
        Dimension::Schedule => values[0] - values[1],
        _ => values[0],
    };

    let finding = rule_bands(dimension, thresholds)
        .classify(observed)
        .map(|(severity, threshold)| AnomalyFinding {
            id: format!("{dimension}-{index}"),
            dimension,
            severity,
            message: finding_message(dimension, observed, threshold),
            observed_value: observed,
            threshold,
            source_index: index,
        });
    RuleOutcome::Evaluated(finding)
}

fn rule_fields(dimension: Dimension) -> &'static [&'static str] {
    match dimension {
        Dimension::Schedule => &[EXPECTED_PROGRESS_FIELD, PROGRESS_FIELD],
        Dimension::Cost => &[COST_VARIANCE_FIELD],
        Dimension::Safety => &[RISK_SCORE_FIELD],
        Dimension::Quality => &[DEFECT_RATE_FIELD],
    }
}

fn rule_bands(dimension: Dimension, thresholds: &AnomalyThresholds) -> &SeverityBands {
    match dimension {
        Dimension::Schedule => &thresholds.schedule,
        Dimension::Cost => &thresholds.cost,
        Dimension::Safety => &thresholds.safety,
        Dimension::Quality => &thresholds.quality,
    }
}

/// All of `fields` as finite numbers, or `None` when any is missing or
/// unusable.
fn read_numbers(record: &Observation, fields: &[&str]) -> Option<Vec<f64>> {
    fields
        .iter()
        .map(|name| match record.get(name) {
            Some(ObservationValue::Number(value)) if value.is_finite() => Some(*value),
            _ => None,
        })
        .collect()
}

fn finding_message(dimension: Dimension, observed: f64, threshold: f64) -> String {
    match dimension {
        Dimension::Schedule => format!(
            "Progress is {observed:.1} percentage points behind plan (band starts above {threshold:.1})"
        ),
        Dimension::Cost => {
            format!("Cost variance of {observed:.1}% exceeds {threshold:.1}%")
        }
        Dimension::Safety => {
            format!("Safety risk score {observed:.2} exceeds {threshold:.2}")
        }
        Dimension::Quality => {
            format!("Defect rate of {observed:.1}% exceeds {threshold:.1}%")
        }
    }
}
