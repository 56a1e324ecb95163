//! Thompson sampling over unbounded scalar rewards.
//!
//! Each arm's mean reward is modelled with the Student-t posterior that follows
//! from a normal likelihood with unknown variance: with `n` samples, mean `q`
//! and squared-deviation sum `m2`, a posterior draw is
//! `q + t * sqrt(m2 / (n (n - 1)))` with `t ~ StudentT(n - 1)`.
//!
//! Notes:
//! - An arm needs two samples before it has a posterior. Arms below that are
//!   returned first, in index order; this is why selectors bootstrap every arm
//!   with the same two samples.
//! - This policy is **seedable** so selection can be reproducible in tests.
//! - Default construction uses a fixed seed (deterministic by default).

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StudentT};

use crate::alloc::uniform;
use crate::error::Result;
use crate::experience::Experience;
use crate::policy::BanditPolicy;

/// Configuration for Thompson sampling.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThompsonConfig {
    /// Monte-Carlo draws used by [`ThompsonSampling::policy`] to estimate the
    /// probability that each arm is the posterior argmax.
    pub policy_trials: usize,
}

impl Default for ThompsonConfig {
    fn default() -> Self {
        Self {
            policy_trials: 1_000,
        }
    }
}

/// Seedable Student-t Thompson-sampling bandit.
#[derive(Debug, Clone)]
pub struct ThompsonSampling {
    cfg: ThompsonConfig,
    experience: Experience,
    rng: StdRng,
}

impl ThompsonSampling {
    /// Create a bandit over `num_arms` arms with a deterministic fixed seed (0).
    pub fn new(num_arms: usize, cfg: ThompsonConfig) -> Self {
        Self::with_seed(num_arms, cfg, 0)
    }

    /// Create a bandit over `num_arms` arms with a fixed seed (reproducible).
    pub fn with_seed(num_arms: usize, cfg: ThompsonConfig, seed: u64) -> Self {
        Self {
            cfg,
            experience: Experience::new(num_arms),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> ThompsonConfig {
        self.cfg
    }

    /// First arm (stable order) without enough samples for a posterior.
    fn under_sampled(&self) -> Option<usize> {
        self.experience.visits().iter().position(|&n| n < 2)
    }

    fn sample_mean(&mut self, arm: usize) -> f64 {
        let n = self.experience.visits()[arm];
        let q = self.experience.q()[arm];
        let m2 = self.experience.m2()[arm];
        let nf = n as f64;
        let scale = (m2 / (nf * (nf - 1.0))).max(0.0).sqrt();
        if !scale.is_finite() || scale == 0.0 {
            return q;
        }
        match StudentT::new(nf - 1.0) {
            Ok(dist) => q + dist.sample(&mut self.rng) * scale,
            Err(_) => q,
        }
    }

    fn argmax_draw(&mut self) -> usize {
        let mut best = 0usize;
        let mut best_sample = f64::NEG_INFINITY;
        for arm in 0..self.experience.num_arms() {
            let x = self.sample_mean(arm);
            // Strict `>` keeps the lowest index on ties.
            if x > best_sample {
                best_sample = x;
                best = arm;
            }
        }
        best
    }
}

impl BanditPolicy for ThompsonSampling {
    fn num_arms(&self) -> usize {
        self.experience.num_arms()
    }

    fn record(&mut self, arm: usize, reward: f64) -> Result<()> {
        self.experience.record(arm, reward)
    }

    /// Select an arm.
    ///
    /// - Explore: return the first arm (index order) with fewer than 2 samples.
    /// - Otherwise: draw from every arm's posterior and choose the max.
    fn sample_action(&mut self) -> usize {
        if let Some(arm) = self.under_sampled() {
            return arm;
        }
        self.argmax_draw()
    }

    fn policy(&mut self) -> Vec<f64> {
        let k = self.num_arms();
        if k == 0 {
            return Vec::new();
        }
        if let Some(arm) = self.under_sampled() {
            let mut out = vec![0.0; k];
            out[arm] = 1.0;
            return out;
        }
        let trials = self.cfg.policy_trials.max(1);
        let mut wins = vec![0u64; k];
        for _ in 0..trials {
            wins[self.argmax_draw()] += 1;
        }
        let total: u64 = wins.iter().sum();
        if total == 0 {
            return uniform(k);
        }
        wins.into_iter()
            .map(|w| w as f64 / total as f64)
            .collect()
    }

    fn experience(&self) -> &Experience {
        &self.experience
    }
}
