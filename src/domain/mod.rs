pub mod anomaly;
pub mod evm;
pub mod risk;
pub mod snapshot;
pub mod validation;
