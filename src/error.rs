//! Crate-wide error type.
//!
//! Every variant marks a caller or protocol-layer bug (bad index, malformed or
//! unexpected response). Operations that return one of these never partially
//! apply: validation runs before any state is touched.

use thiserror::Error;

/// Errors returned by selector and aggregator operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("arm space must contain at least one arm")]
    NoArms,

    #[error("arm index {arm} out of range for {num_arms} arms")]
    ArmOutOfRange { arm: usize, num_arms: usize },

    #[error("policy has {policy} arms, selector configured for {configured}")]
    ArmCountMismatch { policy: usize, configured: usize },

    #[error("policy already holds {timesteps} recorded samples; bootstrap needs a fresh policy")]
    PolicyNotFresh { timesteps: u64 },

    #[error("invalid bootstrap rewards: {0}")]
    InvalidBootstrap(&'static str),

    #[error("non-finite reward for arm {arm}")]
    NonFiniteReward { arm: usize },

    #[error("frame counter width must be in 1..=32 bits, got {0}")]
    InvalidFrameBits(u32),

    #[error("reward response carries {got} statistics, expected {expected}")]
    ResponseLength { expected: usize, got: usize },

    #[error("reward response answers frame {got}, pending request is for frame {expected}")]
    StaleResponse { expected: u32, got: u32 },

    #[error("reward response received with no request outstanding")]
    NoPendingRequest,

    #[error("non-finite statistic reported for arm {arm}")]
    NonFiniteStatistic { arm: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
