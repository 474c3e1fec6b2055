pub mod anomaly_detection;
pub mod cancellation;
pub mod cost_forecast;
pub mod engine_config;
pub mod evm_calculation;
pub mod factor_sampler;
pub mod forecast_error;
pub mod health_aggregation;
pub mod histogram;
pub mod monte_carlo;
pub mod percentiles;
pub mod project_forecast;
pub mod schedule_forecast;
pub mod simulation_types;
pub mod snapshot_file;
pub mod snapshot_source;
