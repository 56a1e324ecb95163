//! Arm selection over a bootstrapped bandit policy.
//!
//! [`ArmSelector`] insulates the rest of the crate from the policy API and owns
//! the one mandatory initialization step: every arm receives the same bootstrap
//! samples, in the same order, before any decision is requested. Seeding arms
//! unequally biases early exploration toward whichever arm was over-seeded.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::policy::BanditPolicy;
use crate::qsoftmax::QSoftmax;
use crate::thompson::{ThompsonConfig, ThompsonSampling};

/// Default arm count: one arm per LoRa spreading factor SF7..SF12.
pub const DEFAULT_NUM_ARMS: usize = 6;

/// Configuration for [`ArmSelector`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorConfig {
    /// Size of the arm space. Fixed for the selector's lifetime.
    pub num_arms: usize,
    /// Fictional samples recorded for every arm at construction.
    ///
    /// At least two finite, not-all-equal values give every arm a proper (and
    /// identical) posterior under Student-t Thompson sampling. Anything else is
    /// rejected with [`Error::InvalidBootstrap`].
    pub bootstrap_rewards: Vec<f64>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            num_arms: DEFAULT_NUM_ARMS,
            bootstrap_rewards: vec![0.0, 1.0],
        }
    }
}

impl SelectorConfig {
    /// Default bootstrap over `num_arms` arms.
    pub fn with_arms(num_arms: usize) -> Self {
        Self {
            num_arms,
            ..Self::default()
        }
    }
}

/// Check that `rewards` gives every arm a proper, non-degenerate posterior.
///
/// Requires at least two samples, all finite, with non-zero spread. Anything
/// less leaves the policy breaking ties toward the lowest arm index.
pub fn validate_bootstrap(rewards: &[f64]) -> Result<()> {
    if rewards.len() < 2 {
        return Err(Error::InvalidBootstrap("need at least two samples per arm"));
    }
    if rewards.iter().any(|r| !r.is_finite()) {
        return Err(Error::InvalidBootstrap("samples must be finite"));
    }
    let mean = rewards.iter().sum::<f64>() / rewards.len() as f64;
    let spread: f64 = rewards.iter().map(|r| (r - mean).powi(2)).sum();
    if spread <= 0.0 {
        return Err(Error::InvalidBootstrap("samples must not all be equal"));
    }
    Ok(())
}

/// Stable arm-selection / learning surface over a [`BanditPolicy`].
#[derive(Debug, Clone)]
pub struct ArmSelector<P> {
    policy: P,
    num_arms: usize,
}

impl<P: BanditPolicy> ArmSelector<P> {
    /// Wrap a fresh `policy` and bootstrap every arm equally.
    ///
    /// Fails if the arm space is empty, if the policy's arm count disagrees with
    /// `cfg.num_arms`, if the policy already holds experience (pre-seeded arms
    /// would not start from a comparable state), or if the bootstrap rewards
    /// cannot give every arm a proper posterior (see [`validate_bootstrap`]).
    pub fn new(mut policy: P, cfg: SelectorConfig) -> Result<Self> {
        if cfg.num_arms == 0 {
            return Err(Error::NoArms);
        }
        if policy.num_arms() != cfg.num_arms {
            return Err(Error::ArmCountMismatch {
                policy: policy.num_arms(),
                configured: cfg.num_arms,
            });
        }
        let timesteps = policy.experience().timesteps();
        if timesteps != 0 {
            return Err(Error::PolicyNotFresh { timesteps });
        }
        validate_bootstrap(&cfg.bootstrap_rewards)?;

        for arm in 0..cfg.num_arms {
            for &r in &cfg.bootstrap_rewards {
                policy.record(arm, r)?;
            }
        }
        debug!(
            num_arms = cfg.num_arms,
            samples_per_arm = cfg.bootstrap_rewards.len(),
            "bootstrapped arm selector"
        );

        Ok(Self {
            policy,
            num_arms: cfg.num_arms,
        })
    }

    /// Draw an arm in `[0, number_of_arms())` from the policy.
    pub fn choose_arm(&mut self) -> usize {
        trace!(q = ?self.policy.experience().q(), "arm selector state");
        let arm = self.policy.sample_action();
        debug!(arm, "chose arm");
        arm
    }

    /// Forward one reward sample for `arm` to the policy's experience.
    ///
    /// Out-of-range arms and non-finite rewards are rejected before the policy
    /// sees them.
    pub fn update_reward(&mut self, arm: usize, reward: f64) -> Result<()> {
        if arm >= self.num_arms {
            return Err(Error::ArmOutOfRange {
                arm,
                num_arms: self.num_arms,
            });
        }
        if !reward.is_finite() {
            return Err(Error::NonFiniteReward { arm });
        }
        self.policy.record(arm, reward)?;
        debug!(arm, reward, "recorded reward");
        Ok(())
    }

    /// Fixed arm-space size.
    pub fn number_of_arms(&self) -> usize {
        self.num_arms
    }

    /// Current action distribution of the wrapped policy.
    pub fn policy(&mut self) -> Vec<f64> {
        let p = self.policy.policy();
        trace!(policy = ?p, "arm selector policy");
        p
    }

    /// Read access to the wrapped policy (and through it, its experience).
    pub fn policy_ref(&self) -> &P {
        &self.policy
    }
}

impl ArmSelector<ThompsonSampling> {
    /// Student-t Thompson sampling selector with a fixed seed.
    pub fn thompson(cfg: SelectorConfig, seed: u64) -> Result<Self> {
        let policy = ThompsonSampling::with_seed(cfg.num_arms, ThompsonConfig::default(), seed);
        Self::new(policy, cfg)
    }
}

impl ArmSelector<QSoftmax> {
    /// Softmax selector with the given temperature and a fixed seed.
    pub fn softmax(cfg: SelectorConfig, temperature: f64, seed: u64) -> Result<Self> {
        let policy = QSoftmax::with_seed(cfg.num_arms, temperature, seed);
        Self::new(policy, cfg)
    }
}
