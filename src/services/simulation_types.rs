use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::evm::EvmResult;
use crate::domain::risk::RiskLevel;

/// Spread of the retained simulation samples.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SamplePercentiles {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScheduleForecast {
    pub original_end_date: NaiveDate,
    pub forecasted_end_date: NaiveDate,
    pub delay_days: f64,
    pub probability_on_time: f64,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub completion_days: SamplePercentiles,
    pub iterations: usize,
    pub discarded_iterations: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CostForecast {
    pub original_budget: f64,
    pub forecasted_cost: f64,
    pub variance_percent: f64,
    pub probability_within_budget: f64,
    pub risk_level: RiskLevel,
    pub cost_range: SamplePercentiles,
    pub iterations: usize,
    pub discarded_iterations: usize,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    AtRisk,
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::AtRisk => "at_risk",
            HealthStatus::Critical => "critical",
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallAssessment {
    pub health_score: u8,
    pub health_status: HealthStatus,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProjectForecast {
    pub project_name: String,
    pub seed: u64,
    pub evm_metrics: EvmResult,
    pub schedule_forecast: ScheduleForecast,
    pub cost_forecast: CostForecast,
    pub overall_assessment: OverallAssessment,
}

/// A forecast together with the raw samples behind it, for histogram output.
#[derive(Debug, Clone)]
pub struct ForecastOutput {
    pub report: ProjectForecast,
    pub schedule_samples: Vec<f64>,
    pub cost_samples: Vec<f64>,
}
