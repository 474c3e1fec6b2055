use thiserror::Error;

use crate::domain::validation::ValidationError;
use crate::services::monte_carlo::SimulationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("invalid forecast input: {0}")]
    Validation(#[from] ValidationError),
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
}
