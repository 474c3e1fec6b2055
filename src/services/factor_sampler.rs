use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::services::monte_carlo::SimulationError;

/// Draws one performance factor per simulated iteration.
pub trait FactorSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;
}

/// Normal distribution around a performance index with a proportional
/// standard deviation, clipped from below so divisions stay bounded.
#[derive(Debug, Clone, Copy)]
pub struct ClippedNormalSampler {
    normal: Normal<f64>,
    min_factor: f64,
}

impl ClippedNormalSampler {
    pub fn new(
        index: f64,
        std_dev_multiplier: f64,
        min_factor: f64,
    ) -> Result<Self, SimulationError> {
        let std_dev = (index * std_dev_multiplier).abs();
        let normal = Normal::new(index, std_dev)
            .map_err(|e| SimulationError::InvalidDistribution(e.to_string()))?;
        Ok(Self { normal, min_factor })
    }
}

impl FactorSampler for ClippedNormalSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng).max(self.min_factor)
    }
}
