//! Per-trial random source.
//!
//! Each trial-runner invocation owns its generator, so repeated or parallel
//! invocations can never share hidden global state. Campaigns seed from
//! entropy for independent draws; tests seed explicitly for reproducibility.
//! The normal sampler is Box-Muller on top of the uniform stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic random source for one trial-runner invocation.
#[derive(Debug, Clone)]
pub struct TrialRng {
    rng: Pcg32,
}

impl TrialRng {
    /// Fixed-seed generator for reproducible reruns.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Independently seeded generator for sampling campaigns.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random::<u64>())
    }

    /// Uniform f32 in [0, 1).
    pub fn uniform(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform f32 in [min, max).
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.uniform()
    }

    /// Uniform index below `len`.
    ///
    /// # Panics
    ///
    /// Panics if `len == 0`.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Standard normal sample (Box-Muller).
    pub fn standard_normal(&mut self) -> f32 {
        // Avoid ln(0)
        let u1 = self.uniform().max(f32::EPSILON);
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
    }

    /// Normal sample with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f32, sigma: f32) -> f32 {
        mean + sigma * self.standard_normal()
    }
}
