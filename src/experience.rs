//! Per-arm reward experience.
//!
//! Tracks, for each arm index, the number of recorded samples, their running
//! mean, and the running sum of squared deviations (Welford). Policies own one
//! `Experience` and read from it when sampling.

use crate::error::{Error, Result};

/// Reward experience for a fixed set of arms.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Experience {
    visits: Vec<u64>,
    q: Vec<f64>,
    m2: Vec<f64>,
    timesteps: u64,
}

impl Experience {
    /// Empty experience for `num_arms` arms.
    pub fn new(num_arms: usize) -> Self {
        Self {
            visits: vec![0; num_arms],
            q: vec![0.0; num_arms],
            m2: vec![0.0; num_arms],
            timesteps: 0,
        }
    }

    pub fn num_arms(&self) -> usize {
        self.visits.len()
    }

    /// Record one reward sample for `arm`.
    ///
    /// Out-of-range arms and non-finite rewards are rejected without mutation.
    pub fn record(&mut self, arm: usize, reward: f64) -> Result<()> {
        if arm >= self.visits.len() {
            return Err(Error::ArmOutOfRange {
                arm,
                num_arms: self.visits.len(),
            });
        }
        if !reward.is_finite() {
            return Err(Error::NonFiniteReward { arm });
        }
        self.visits[arm] = self.visits[arm].saturating_add(1);
        let n = self.visits[arm] as f64;
        let delta = reward - self.q[arm];
        self.q[arm] += delta / n;
        self.m2[arm] += delta * (reward - self.q[arm]);
        self.timesteps = self.timesteps.saturating_add(1);
        Ok(())
    }

    /// Total samples recorded across all arms.
    pub fn timesteps(&self) -> u64 {
        self.timesteps
    }

    /// Samples recorded per arm.
    pub fn visits(&self) -> &[u64] {
        &self.visits
    }

    /// Mean reward per arm.
    pub fn q(&self) -> &[f64] {
        &self.q
    }

    /// Sum of squared deviations from the mean, per arm.
    pub fn m2(&self) -> &[f64] {
        &self.m2
    }

    /// Sample variance for `arm`, or `None` with fewer than two samples.
    pub fn variance(&self, arm: usize) -> Option<f64> {
        let n = *self.visits.get(arm)?;
        if n < 2 {
            return None;
        }
        Some(self.m2[arm] / (n - 1) as f64)
    }

    /// Forget all recorded samples (arm count is kept).
    pub fn reset(&mut self) {
        self.visits.iter_mut().for_each(|v| *v = 0);
        self.q.iter_mut().for_each(|v| *v = 0.0);
        self.m2.iter_mut().for_each(|v| *v = 0.0);
        self.timesteps = 0;
    }
}
