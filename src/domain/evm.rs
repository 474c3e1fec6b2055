use serde::Serialize;

/// To-complete performance index. `Complete` is reported when the budget is
/// fully spent (BAC = AC) and the ratio is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tcpi {
    Index(f64),
    Complete,
}

impl Tcpi {
    pub fn value(&self) -> Option<f64> {
        match self {
            Tcpi::Index(value) => Some(*value),
            Tcpi::Complete => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvmResult {
    pub budget_at_completion: f64,
    pub planned_value: f64,
    pub earned_value: f64,
    pub actual_cost: f64,
    pub spi: f64,
    pub cpi: f64,
    pub eac: f64,
    pub etc: f64,
    pub tcpi: Tcpi,
    pub vac: f64,
    pub schedule_variance: f64,
    pub cost_variance: f64,
    /// False while PV is zero and `spi` holds the neutral default.
    pub schedule_baseline_established: bool,
    /// False while AC is zero and `cpi` holds the neutral default.
    pub cost_baseline_established: bool,
}
