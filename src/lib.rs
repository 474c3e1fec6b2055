//! Forecast and anomaly engine for construction projects: earned value
//! metrics, Monte Carlo schedule and cost forecasts, anomaly findings and an
//! overall health score.

pub mod commands;
pub mod domain;
pub mod services;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use domain::anomaly::{AnomalyFinding, AnomalyReport, Dimension, Observation};
pub use domain::evm::{EvmResult, Tcpi};
pub use domain::risk::{RiskLevel, Severity};
pub use domain::snapshot::{ProjectSnapshot, ProjectSnapshotRecord};
pub use domain::validation::ValidationError;
pub use services::anomaly_detection::detect_anomalies;
pub use services::cancellation::CancellationToken;
pub use services::engine_config::EngineConfig;
pub use services::evm_calculation::compute_evm;
pub use services::forecast_error::ForecastError;
pub use services::monte_carlo::SimulationError;
pub use services::project_forecast::{forecast_project, forecast_project_with_findings};
pub use services::simulation_types::{
    CostForecast, HealthStatus, OverallAssessment, ProjectForecast, ScheduleForecast,
};
