use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use rand::Rng;

use crate::domain::snapshot::{ProjectSnapshot, ProjectSnapshotRecord};
use crate::services::engine_config::EngineConfig;
use crate::services::factor_sampler::FactorSampler;

// A FactorSampler that always returns the same factor
pub struct ConstantSampler(pub f64);

impl FactorSampler for ConstantSampler {
    fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> f64 {
        self.0
    }
}

// Cycles through fixed factors; totals are exact even when batches run in parallel
pub struct SequenceSampler {
    values: Vec<f64>,
    next: AtomicUsize,
}

impl SequenceSampler {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            next: AtomicUsize::new(0),
        }
    }
}

impl FactorSampler for SequenceSampler {
    fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> f64 {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.values[index % self.values.len()]
    }
}

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// 45 % done against 50 % planned, half the budget spent, day 200 of 400.
pub fn snapshot_record() -> ProjectSnapshotRecord {
    ProjectSnapshotRecord {
        project_name: "Harbour Bridge".to_string(),
        planned_end_date: on_date(2026, 12, 31),
        current_progress: 45.0,
        planned_progress: 50.0,
        elapsed_days: 200,
        project_duration_days: 400,
        budget: 1_000_000.0,
        actual_cost: 500_000.0,
    }
}

pub fn build_snapshot(record: ProjectSnapshotRecord) -> ProjectSnapshot {
    ProjectSnapshot::try_from(record).unwrap()
}

pub fn seeded_config(seed: u64) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.simulation.seed = Some(seed);
    config
}
