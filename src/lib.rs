//! `adrmux`: bandit-driven transmission-parameter selection with delayed,
//! windowed rewards.
//!
//! Designed for end nodes (LoRaWAN-style) that choose a discrete transmission
//! configuration per frame, an "arm" such as a spreading-factor/coding-rate
//! pair, and only learn how good those choices were much later: the peer
//! reports aggregated per-arm statistics for a whole window of frames, after a
//! network round trip, and the request for that report may itself be lost and
//! re-sent.
//!
//! Two components:
//!
//! - [`ArmSelector`]: a thin adapter over a [`BanditPolicy`]. Construction
//!   bootstraps every arm with the same fictional samples so no arm starts out
//!   favoured.
//! - [`DelayedRewardAggregator`]: the windowing state machine. It records which
//!   arm each frame used, builds [`RewardRequest`]s for the unreported window,
//!   and turns a [`RewardResponse`] into per-arm rewards for the selector
//!   without double-counting frames when a request is retransmitted.
//!
//! **Policies:**
//! - [`ThompsonSampling`]: Student-t Thompson sampling over unbounded scalar
//!   rewards (seedable, deterministic by default).
//! - [`QSoftmax`]: temperature-controlled softmax over mean rewards.
//!
//! **Frame counters** wrap at a power of two; [`FrameSpace`] does all the
//! modular arithmetic (deltas, serial-number ordering).
//!
//! **Non-goals:**
//! - No wire encoding of the request/response MAC commands.
//! - No multi-node coordination: each node owns one selector and one aggregator.
//! - No decision on *when* a report is needed beyond an optional usage
//!   threshold ([`ReportCadence`]); the surrounding control logic owns that.
//!
//! # Example
//!
//! ```rust
//! use adrmux::{
//!     AggregatorConfig, ArmSelector, DelayedRewardAggregator, RewardResponse, SelectorConfig,
//! };
//!
//! let selector = ArmSelector::thompson(SelectorConfig::default(), 7).unwrap();
//! let mut agg = DelayedRewardAggregator::init(selector, AggregatorConfig::default()).unwrap();
//!
//! for frame in 0..10u32 {
//!     let arm = agg.choose_arm();
//!     // ... transmit `frame` using `arm` ...
//!     agg.record_use(arm, frame).unwrap();
//! }
//!
//! if agg.is_report_needed() {
//!     let req = agg.build_reward_request(9);
//!     assert_eq!(req.frame_delta, 9);
//!     // ... later, the peer answers with one statistic per arm ...
//!     let resp = RewardResponse::answering(&req, vec![1.0; 6]);
//!     agg.consume_reward_response(&resp).unwrap();
//!     assert_eq!(agg.window().min_frame_without_stats, 10);
//! }
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::{Error, Result};

mod frame;
pub use frame::*;

mod alloc;
pub use alloc::{softmax, uniform};

mod experience;
pub use experience::*;

mod policy;
pub use policy::BanditPolicy;

mod thompson;
pub use thompson::*;

mod qsoftmax;
pub use qsoftmax::*;

mod selector;
pub use selector::*;

mod message;
pub use message::*;

mod aggregator;
pub use aggregator::*;

pub const ADRMUX_VERSION: &str = env!("CARGO_PKG_VERSION");
