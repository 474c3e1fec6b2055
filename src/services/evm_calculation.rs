use crate::domain::evm::{EvmResult, Tcpi};
use crate::domain::snapshot::ProjectSnapshot;
use crate::domain::validation::{ValidationError, ensure_finite, ensure_percent};

/// Earned value metrics from raw budget, cost and progress figures.
///
/// Zero denominators fall back to neutral values so that a project that has
/// not started yet still reports metrics:
/// - PV = 0 => SPI = 1.0
/// - AC = 0 => CPI = 1.0
/// - CPI <= 0 => EAC = BAC
/// - BAC = AC => TCPI is [`Tcpi::Complete`]
pub fn compute_evm(
    budget_at_completion: f64,
    actual_cost: f64,
    percent_complete: f64,
    planned_percent: f64,
) -> Result<EvmResult, ValidationError> {
    let bac = ensure_finite("budget_at_completion", budget_at_completion)?;
    if bac <= 0.0 {
        return Err(ValidationError::NonPositiveBudget(bac));
    }
    let ac = ensure_finite("actual_cost", actual_cost)?;
    if ac < 0.0 {
        return Err(ValidationError::NegativeActualCost(ac));
    }
    let percent_complete = ensure_percent("percent_complete", percent_complete)?;
    let planned_percent = ensure_percent("planned_percent", planned_percent)?;

    let pv = bac * planned_percent / 100.0;
    let ev = bac * percent_complete / 100.0;

    let schedule_baseline_established = pv > 0.0;
    let spi = if schedule_baseline_established { ev / pv } else { 1.0 };
    let cost_baseline_established = ac > 0.0;
    let cpi = if cost_baseline_established { ev / ac } else { 1.0 };

    let eac = if cpi > 0.0 { ac + (bac - ev) / cpi } else { bac };
    let remaining_budget = bac - ac;
    let tcpi = if remaining_budget != 0.0 {
        Tcpi::Index((bac - ev) / remaining_budget)
    } else {
        Tcpi::Complete
    };

    Ok(EvmResult {
        budget_at_completion: bac,
        planned_value: pv,
        earned_value: ev,
        actual_cost: ac,
        spi,
        cpi,
        eac,
        etc: eac - ac,
        tcpi,
        vac: bac - eac,
        schedule_variance: ev - pv,
        cost_variance: ev - ac,
        schedule_baseline_established,
        cost_baseline_established,
    })
}

pub fn compute_snapshot_evm(snapshot: &ProjectSnapshot) -> Result<EvmResult, ValidationError> {
    compute_evm(
        snapshot.budget(),
        snapshot.actual_cost(),
        snapshot.current_progress(),
        snapshot.planned_progress(),
    )
}
