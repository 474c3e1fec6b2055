use crate::domain::anomaly::AnomalyReport;
use crate::domain::risk::Severity;
use crate::services::engine_config::HealthWeights;
use crate::services::simulation_types::{HealthStatus, OverallAssessment};

/// Finding counts that feed the health score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindingCounts {
    pub critical: usize,
    pub high: usize,
}

impl FindingCounts {
    pub fn from_report(report: &AnomalyReport) -> Self {
        Self {
            critical: report.count_with_severity(Severity::Critical),
            high: report.count_with_severity(Severity::High),
        }
    }
}

/// `w1 * p_on_time + w2 * p_within_budget - w3 * critical - w4 * high`,
/// rounded and clamped to [0, 100].
pub fn assess_health(
    probability_on_time: f64,
    probability_within_budget: f64,
    findings: FindingCounts,
    weights: &HealthWeights,
) -> OverallAssessment {
    let raw = weights.schedule_weight * probability_on_time
        + weights.cost_weight * probability_within_budget
        - weights.critical_finding_penalty * findings.critical as f64
        - weights.high_finding_penalty * findings.high as f64;
    let health_score = if raw.is_nan() {
        0
    } else {
        raw.round().clamp(0.0, 100.0) as u8
    };

    OverallAssessment {
        health_score,
        health_status: health_status(health_score),
    }
}

pub fn health_status(health_score: u8) -> HealthStatus {
    match health_score {
        80.. => HealthStatus::Healthy,
        50..=79 => HealthStatus::AtRisk,
        _ => HealthStatus::Critical,
    }
}
