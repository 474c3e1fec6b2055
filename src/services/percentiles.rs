//! Percentile helpers for already-sorted slices.
//!
//! - Empty input => `None`.
//! - `percentile <= 0` => first element.
//! - `percentile >= 100` => last element.
//! - Otherwise we compute a position within `[0, len-1]` and round to the
//!   nearest index.

use crate::services::simulation_types::SamplePercentiles;

/// Returns the percentile value from a slice that is already sorted in
/// ascending order.
pub fn value_sorted<T: Copy>(sorted_values: &[T], percentile: f64) -> Option<T> {
    if sorted_values.is_empty() {
        return None;
    }

    let index = if percentile <= 0.0 {
        0
    } else if percentile >= 100.0 {
        sorted_values.len() - 1
    } else {
        let position = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
        position.round() as usize
    };

    sorted_values.get(index).copied()
}

/// Median of an ascending slice; averages the two middle values for even
/// lengths.
pub fn median_sorted(sorted_values: &[f64]) -> Option<f64> {
    let len = sorted_values.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    if len % 2 == 1 {
        Some(sorted_values[mid])
    } else {
        Some((sorted_values[mid - 1] + sorted_values[mid]) / 2.0)
    }
}

pub fn spread_sorted(sorted_values: &[f64]) -> SamplePercentiles {
    SamplePercentiles {
        p10: value_sorted(sorted_values, 10.0).unwrap_or(0.0),
        p50: median_sorted(sorted_values).unwrap_or(0.0),
        p90: value_sorted(sorted_values, 90.0).unwrap_or(0.0),
    }
}

/// Fraction of values satisfying `predicate`; `0.0` for empty input.
pub fn fraction_where(values: &[f64], predicate: impl Fn(f64) -> bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let hits = values.iter().filter(|value| predicate(**value)).count();
    hits as f64 / values.len() as f64
}
