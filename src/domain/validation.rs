use thiserror::Error;

/// Raised for out-of-range or structurally invalid inputs. Never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("budget at completion must be greater than zero, got {0}")]
    NonPositiveBudget(f64),
    #[error("actual cost must not be negative, got {0}")]
    NegativeActualCost(f64),
    #[error("{field} must be within [0, 100], got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("project name must not be empty")]
    EmptyProjectName,
    #[error("elapsed days must not be negative, got {0}")]
    NegativeElapsedDays(i64),
    #[error("project duration must be greater than zero days, got {0}")]
    NonPositiveDuration(i64),
    #[error("elapsed days {elapsed} exceed the project duration of {duration} days")]
    ElapsedExceedsDuration { elapsed: i64, duration: i64 },
    #[error("iterations must be within [{min}, {max}], got {iterations}")]
    IterationsOutOfRange {
        iterations: usize,
        min: usize,
        max: usize,
    },
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

pub(crate) fn ensure_percent(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = ensure_finite(field, value)?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::PercentOutOfRange { field, value })
    }
}
