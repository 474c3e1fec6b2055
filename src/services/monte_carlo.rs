use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::services::cancellation::CancellationToken;
use crate::services::factor_sampler::FactorSampler;

/// Iterations per batch; cancellation is polled once per batch.
pub const BATCH_SIZE: usize = 100;
/// Runs discarding more than this share of iterations are rejected.
pub const MAX_DISCARD_FRACTION: f64 = 0.5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("{discarded} of {total} iterations produced non-finite results")]
    Unstable { discarded: usize, total: usize },
    #[error("simulation was cancelled")]
    Cancelled,
    #[error("invalid sampling distribution: {0}")]
    InvalidDistribution(String),
}

/// Independent random streams derived from one base seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStream {
    Schedule,
    Cost,
}

impl SeedStream {
    fn id(&self) -> u64 {
        match self {
            SeedStream::Schedule => 1,
            SeedStream::Cost => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub base: u64,
    pub stream: SeedStream,
    pub attempt: u64,
}

impl SeedPlan {
    pub fn new(base: u64, stream: SeedStream) -> Self {
        Self {
            base,
            stream,
            attempt: 0,
        }
    }

    fn next_attempt(self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self
        }
    }

    /// Seed of one batch. Depends only on the plan and the batch index, so
    /// the filled buffer does not depend on thread scheduling.
    pub fn batch_seed(&self, batch: usize) -> u64 {
        let mut seed = splitmix64(self.base);
        seed = splitmix64(seed ^ self.stream.id());
        seed = splitmix64(seed ^ self.attempt);
        splitmix64(seed ^ batch as u64)
    }
}

fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Retained samples of one run, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub samples: Vec<f64>,
    pub iterations: usize,
    pub discarded: usize,
}

/// Fills a pre-sized buffer with `outcome(factor)` for every iteration,
/// batch by batch on the rayon pool.
pub fn run_simulation<S, F>(
    iterations: usize,
    seeds: SeedPlan,
    sampler: &S,
    outcome: F,
    cancel: &CancellationToken,
) -> Result<SimulationRun, SimulationError>
where
    S: FactorSampler + Sync,
    F: Fn(f64) -> f64 + Sync,
{
    let mut buffer = vec![f64::NAN; iterations];
    buffer
        .par_chunks_mut(BATCH_SIZE)
        .enumerate()
        .try_for_each(|(batch, chunk)| {
            if cancel.is_cancelled() {
                return Err(SimulationError::Cancelled);
            }
            let mut rng = StdRng::seed_from_u64(seeds.batch_seed(batch));
            for slot in chunk.iter_mut() {
                *slot = outcome(sampler.sample(&mut rng));
            }
            Ok(())
        })?;

    buffer.retain(|value| value.is_finite());
    let discarded = iterations - buffer.len();
    if discarded as f64 > iterations as f64 * MAX_DISCARD_FRACTION {
        return Err(SimulationError::Unstable {
            discarded,
            total: iterations,
        });
    }
    buffer.sort_by(f64::total_cmp);

    Ok(SimulationRun {
        samples: buffer,
        iterations,
        discarded,
    })
}

/// [`run_simulation`], repeated once with a fresh attempt stream when the
/// first run is unstable.
pub fn run_with_retry<S, F>(
    iterations: usize,
    seeds: SeedPlan,
    sampler: &S,
    outcome: F,
    cancel: &CancellationToken,
) -> Result<SimulationRun, SimulationError>
where
    S: FactorSampler + Sync,
    F: Fn(f64) -> f64 + Sync,
{
    debug!(iterations, stream = ?seeds.stream, "starting monte carlo run");
    match run_simulation(iterations, seeds, sampler, &outcome, cancel) {
        Err(SimulationError::Unstable { discarded, total }) => {
            warn!(
                discarded,
                total,
                stream = ?seeds.stream,
                "unstable simulation, resampling once"
            );
            run_simulation(iterations, seeds.next_attempt(), sampler, &outcome, cancel)
        }
        result => result,
    }
}
