//! `BanditPolicy` trait: the capability [`ArmSelector`][crate::ArmSelector] wraps.
//!
//! A policy owns its [`Experience`]. Rewards recorded through the policy land in
//! the same instance the policy samples from, so there is never a second copy of
//! the experience that can drift out of sync with what drives selection.
//!
//! Arms are plain indices in `[0, num_arms)`.

use crate::error::Result;
use crate::experience::Experience;

/// Common interface for stateful stochastic bandit policies over indexed arms.
///
/// # Example
///
/// ```rust
/// use adrmux::{BanditPolicy, QSoftmax, ThompsonConfig, ThompsonSampling};
///
/// fn run_policy<P: BanditPolicy>(policy: &mut P) {
///     let arm = policy.sample_action();
///     // ... transmit, learn something ...
///     policy.record(arm, 0.8).unwrap();
/// }
///
/// let mut ts = ThompsonSampling::with_seed(3, ThompsonConfig::default(), 0);
/// let mut sm = QSoftmax::with_seed(3, 0.5, 0);
///
/// run_policy(&mut ts);
/// run_policy(&mut sm);
/// ```
pub trait BanditPolicy {
    /// Size of the arm space (fixed at construction).
    fn num_arms(&self) -> usize;

    /// Ingest one reward observation for `arm`.
    ///
    /// Returns [`Error::ArmOutOfRange`][crate::Error::ArmOutOfRange] without
    /// mutating anything when `arm >= num_arms()`.
    fn record(&mut self, arm: usize, reward: f64) -> Result<()>;

    /// Draw an arm according to the current policy.
    fn sample_action(&mut self) -> usize;

    /// Current action distribution (sums to 1).
    fn policy(&mut self) -> Vec<f64>;

    /// Read access to the owned experience.
    fn experience(&self) -> &Experience;
}
