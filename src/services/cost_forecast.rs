use tracing::debug;

use crate::domain::evm::EvmResult;
use crate::domain::risk::RiskLevel;
use crate::services::cancellation::CancellationToken;
use crate::services::engine_config::SimulationConfig;
use crate::services::factor_sampler::{ClippedNormalSampler, FactorSampler};
use crate::services::forecast_error::ForecastError;
use crate::services::monte_carlo::{SeedPlan, SeedStream, SimulationRun, run_with_retry};
use crate::services::percentiles::{fraction_where, spread_sorted};
use crate::services::simulation_types::CostForecast;

/// Final cost forecast plus the simulated costs it was built from. The cost
/// performance factor is centred on the CPI of `evm`.
pub fn simulate_cost(
    evm: &EvmResult,
    config: &SimulationConfig,
    seed: u64,
    cancel: &CancellationToken,
) -> Result<(CostForecast, SimulationRun), ForecastError> {
    config.validate()?;
    let sampler =
        ClippedNormalSampler::new(evm.cpi, config.cost_std_dev_multiplier, config.min_factor)?;
    simulate_cost_with_sampler(
        evm,
        &sampler,
        config.iterations,
        SeedPlan::new(seed, SeedStream::Cost),
        cancel,
    )
}

pub fn forecast_cost(
    evm: &EvmResult,
    config: &SimulationConfig,
    seed: u64,
    cancel: &CancellationToken,
) -> Result<CostForecast, ForecastError> {
    simulate_cost(evm, config, seed, cancel).map(|(forecast, _)| forecast)
}

pub(crate) fn simulate_cost_with_sampler<S: FactorSampler + Sync>(
    evm: &EvmResult,
    sampler: &S,
    iterations: usize,
    seeds: SeedPlan,
    cancel: &CancellationToken,
) -> Result<(CostForecast, SimulationRun), ForecastError> {
    let bac = evm.budget_at_completion;
    let ac = evm.actual_cost;
    let remaining_work = bac - evm.earned_value;

    let run = run_with_retry(
        iterations,
        seeds,
        sampler,
        |factor| ac + remaining_work / factor,
        cancel,
    )?;

    let cost_range = spread_sorted(&run.samples);
    let forecasted_cost = cost_range.p50;
    let variance_percent = (forecasted_cost - bac) / bac * 100.0;
    let probability_within_budget = fraction_where(&run.samples, |cost| cost <= bac);
    debug!(
        forecasted_cost,
        variance_percent, probability_within_budget, "cost simulation aggregated"
    );

    let forecast = CostForecast {
        original_budget: bac,
        forecasted_cost,
        variance_percent,
        probability_within_budget,
        risk_level: RiskLevel::from_probability(probability_within_budget),
        cost_range,
        iterations: run.iterations,
        discarded_iterations: run.discarded,
    };
    Ok((forecast, run))
}
