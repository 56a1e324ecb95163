//! Softmax over mean rewards (Boltzmann exploration).
//!
//! Useful when a smoother, temperature-controlled exploration is preferred over
//! posterior sampling. Lower temperatures concentrate on the best mean.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::alloc::{pick_from_cdf, softmax};
use crate::error::Result;
use crate::experience::Experience;
use crate::policy::BanditPolicy;

/// Seedable softmax policy over per-arm mean rewards.
#[derive(Debug, Clone)]
pub struct QSoftmax {
    temperature: f64,
    experience: Experience,
    rng: StdRng,
}

impl QSoftmax {
    /// Create a softmax policy with a deterministic fixed seed (0).
    pub fn new(num_arms: usize, temperature: f64) -> Self {
        Self::with_seed(num_arms, temperature, 0)
    }

    /// Create a softmax policy with a fixed seed (reproducible).
    ///
    /// Non-finite or non-positive temperatures are treated as 1.0.
    pub fn with_seed(num_arms: usize, temperature: f64, seed: u64) -> Self {
        Self {
            temperature,
            experience: Experience::new(num_arms),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl BanditPolicy for QSoftmax {
    fn num_arms(&self) -> usize {
        self.experience.num_arms()
    }

    fn record(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.experience.record(arm, reward)
    }

    fn sample_action(&mut self) -> usize {
        let probs = softmax(self.experience.q(), self.temperature);
        let u: f64 = self.rng.random();
        pick_from_cdf(&probs, u)
    }

    fn policy(&mut self) -> Vec<f64> {
        softmax(self.experience.q(), self.temperature)
    }

    fn experience(&self) -> &Experience {
        &self.experience
    }
}
