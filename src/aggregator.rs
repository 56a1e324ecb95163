//! Delayed, windowed reward attribution.
//!
//! Rewards for a transmission choice are not observed per frame. Instead the
//! node periodically asks its peer for aggregated per-arm statistics covering a
//! window of frames, and the answer arrives a network round trip later. The
//! [`DelayedRewardAggregator`] tracks which arms were used since the last
//! consumed report, builds the request for the open window, and, when the
//! response is fed back, turns each arm's statistic into a reward for the bound
//! [`ArmSelector`].
//!
//! Window bookkeeping:
//! - `min` is the first frame not yet covered by a consumed report.
//! - `max` is the newest frame passed to [`record_use`]. An empty window is
//!   `max == min - 1`.
//! - `pending` is the frame the outstanding request was built for. Building a
//!   request again before a response arrives (retransmission) only moves
//!   `pending`; `min` advances to `pending + 1` only when a response is consumed.
//!
//! All frame arithmetic goes through [`FrameSpace`].
//!
//! ```text
//! Idle --record_use--> Idle
//! Idle --build_reward_request--> AwaitingResponse
//! AwaitingResponse --build_reward_request--> AwaitingResponse   (retransmit)
//! AwaitingResponse --record_use--> AwaitingResponse
//! AwaitingResponse --consume_reward_response--> Idle
//! ```
//!
//! [`record_use`]: DelayedRewardAggregator::record_use

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::frame::FrameSpace;
use crate::message::{RewardRequest, RewardResponse};
use crate::policy::BanditPolicy;
use crate::selector::ArmSelector;

/// How an arm's reported statistic becomes a reward sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RewardDerivation {
    /// Statistic divided by the arm's uses in the window.
    #[default]
    PerUse,
    /// Statistic forwarded unchanged.
    Total,
}

impl RewardDerivation {
    /// Derive a reward, or `None` when the arm was not used.
    pub fn derive(self, stat: f64, uses: u64) -> Option<f64> {
        if uses == 0 {
            return None;
        }
        Some(match self {
            RewardDerivation::PerUse => stat / uses as f64,
            RewardDerivation::Total => stat,
        })
    }
}

/// When the aggregator itself raises the report-needed flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportCadence {
    /// Only [`DelayedRewardAggregator::set_report_needed`] changes the flag.
    #[default]
    External,
    /// Raise the flag once this many uses accumulate since the last consumed
    /// report. `EveryUses(0)` behaves like `External`.
    EveryUses(u64),
}

/// Configuration for [`DelayedRewardAggregator`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregatorConfig {
    /// Frame-counter width in bits (`1..=32`).
    pub frame_bits: u32,
    /// First frame of the initial window.
    pub first_frame: u32,
    /// How a reported statistic becomes the reward passed to the selector.
    pub derivation: RewardDerivation,
    /// When the aggregator raises the report-needed flag on its own.
    pub cadence: ReportCadence,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            frame_bits: FrameSpace::FCNT16.bits(),
            first_frame: 0,
            derivation: RewardDerivation::PerUse,
            cadence: ReportCadence::External,
        }
    }
}

/// Per-arm accounting for the open window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmTally {
    /// Selections since the last consumed report.
    pub uses_since_last_stats: u64,
    /// Statistic from the most recent consumed report.
    pub last_known_reward_stat: f64,
}

/// Frame bounds of the unreported window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameWindow {
    /// First frame not yet covered by a consumed report.
    pub min_frame_without_stats: u32,
    /// Newest frame seen by `record_use`; `min - 1` when the window is empty.
    ///
    /// Tracked with serial comparison, so it only follows uses that land less
    /// than half the frame space ahead of it.
    pub max_frame_without_stats: u32,
    /// Frame of the outstanding request, if one is awaiting a response.
    pub pending_request_frame: Option<u32>,
}

impl FrameWindow {
    /// Frames spanned by `[min, max]` (0 when the window is empty).
    ///
    /// Modular, so a window that has grown past the whole frame space reads
    /// short. Report at least every half space to keep it exact.
    pub fn len(&self, space: FrameSpace) -> u32 {
        space.sub(
            space.add(self.max_frame_without_stats, 1),
            self.min_frame_without_stats,
        )
    }

    /// Whether no frame has been used since the last consumed report.
    pub fn is_empty(&self, space: FrameSpace) -> bool {
        self.len(space) == 0
    }
}

/// Externally observable state of the request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AggregatorState {
    Idle,
    AwaitingResponse,
}

/// Windowed delayed-reward state machine bound to one [`ArmSelector`].
#[derive(Debug, Clone)]
pub struct DelayedRewardAggregator<P> {
    selector: ArmSelector<P>,
    cfg: AggregatorConfig,
    space: FrameSpace,
    tallies: Vec<ArmTally>,
    min_frame: u32,
    max_frame: u32,
    pending: Option<u32>,
    needs_stats: bool,
    awaiting_response: bool,
}

impl<P: BanditPolicy> DelayedRewardAggregator<P> {
    /// Bind to `selector` with a zeroed tally per arm and an empty window
    /// starting at `cfg.first_frame`.
    pub fn init(selector: ArmSelector<P>, cfg: AggregatorConfig) -> Result<Self> {
        let space = FrameSpace::new(cfg.frame_bits)?;
        let first = space.wrap(cfg.first_frame);
        let tallies = vec![ArmTally::default(); selector.number_of_arms()];
        debug!(
            num_arms = tallies.len(),
            frame_bits = cfg.frame_bits,
            first_frame = first,
            "initialized delayed reward aggregator"
        );
        Ok(Self {
            selector,
            cfg,
            space,
            tallies,
            min_frame: first,
            max_frame: space.sub(first, 1),
            pending: None,
            needs_stats: true,
            awaiting_response: false,
        })
    }

    /// Choose the next arm through the bound selector.
    pub fn choose_arm(&mut self) -> usize {
        self.selector.choose_arm()
    }

    /// Record that `arm` was used for the transmission numbered `frame`.
    ///
    /// Call exactly once per transmission; uses are not deduplicated.
    ///
    /// `max_frame_without_stats` advances only when `frame` is less than half
    /// the frame space ahead of it. A jump of half the space or more (for
    /// example 128 frames with no recorded use in an 8-bit space) is ambiguous
    /// under serial comparison and leaves it where it was. The use is still
    /// tallied, and requests take their window from `min_frame_without_stats`
    /// and the current frame, so attribution is unaffected.
    pub fn record_use(&mut self, arm: usize, frame: u32) -> Result<()> {
        let num_arms = self.tallies.len();
        let Some(tally) = self.tallies.get_mut(arm) else {
            warn!(arm, num_arms, "record_use with out-of-range arm");
            return Err(Error::ArmOutOfRange { arm, num_arms });
        };
        tally.uses_since_last_stats = tally.uses_since_last_stats.saturating_add(1);
        self.max_frame = self.space.max(self.max_frame, self.space.wrap(frame));

        if let ReportCadence::EveryUses(n) = self.cfg.cadence {
            if n > 0 && !self.needs_stats && self.total_uses() >= n {
                debug!(threshold = n, "usage threshold reached, report needed");
                self.needs_stats = true;
            }
        }
        Ok(())
    }

    /// Whether a reward report should be requested.
    pub fn is_report_needed(&self) -> bool {
        self.needs_stats
    }

    pub fn set_report_needed(&mut self, needed: bool) {
        self.needs_stats = needed;
    }

    /// Build a request covering `[min_frame_without_stats, current_frame]`.
    ///
    /// Calling again before a response is consumed re-arms the pending frame
    /// and leaves the window's lower bound where it is.
    pub fn build_reward_request(&mut self, current_frame: u32) -> RewardRequest {
        let current_frame = self.space.wrap(current_frame);
        let frame_delta = self.space.sub(current_frame, self.min_frame);
        if self.awaiting_response {
            info!(
                current_frame,
                frame_delta,
                previous = ?self.pending,
                "re-issuing reward request"
            );
        } else {
            debug!(current_frame, frame_delta, "issuing reward request");
        }
        self.pending = Some(current_frame);
        self.awaiting_response = true;
        RewardRequest {
            current_frame,
            frame_delta,
        }
    }

    /// Attribute a reward response to the pending request.
    ///
    /// Returns the `(arm, reward)` samples forwarded to the selector, in arm
    /// order. Arms with no uses in the window are skipped. The whole response
    /// is validated first; on error nothing is changed and nothing is forwarded.
    pub fn consume_reward_response(
        &mut self,
        response: &RewardResponse,
    ) -> Result<Vec<(usize, f64)>> {
        let pending = self.validate(response)?;

        let mut forwarded = Vec::new();
        for (arm, (tally, &stat)) in self.tallies.iter_mut().zip(&response.stats).enumerate() {
            if let Some(reward) = self
                .cfg
                .derivation
                .derive(stat, tally.uses_since_last_stats)
            {
                self.selector.update_reward(arm, reward)?;
                forwarded.push((arm, reward));
            }
            tally.last_known_reward_stat = stat;
            tally.uses_since_last_stats = 0;
        }

        self.max_frame = self.space.max(self.max_frame, pending);
        self.min_frame = self.space.add(pending, 1);
        self.pending = None;
        self.awaiting_response = false;
        info!(
            answered_frame = pending,
            next_min_frame = self.min_frame,
            rewarded_arms = forwarded.len(),
            "consumed reward response"
        );
        Ok(forwarded)
    }

    fn validate(&self, response: &RewardResponse) -> Result<u32> {
        let pending = match (self.awaiting_response, self.pending) {
            (true, Some(p)) => p,
            _ => {
                warn!("reward response with no outstanding request");
                return Err(Error::NoPendingRequest);
            }
        };
        if response.stats.len() != self.tallies.len() {
            warn!(
                expected = self.tallies.len(),
                got = response.stats.len(),
                "malformed reward response"
            );
            return Err(Error::ResponseLength {
                expected: self.tallies.len(),
                got: response.stats.len(),
            });
        }
        if let Some(echo) = response.request_frame {
            let echo = self.space.wrap(echo);
            if echo != pending {
                warn!(expected = pending, got = echo, "stale reward response");
                return Err(Error::StaleResponse {
                    expected: pending,
                    got: echo,
                });
            }
        }
        if let Some(arm) = response.stats.iter().position(|s| !s.is_finite()) {
            warn!(arm, "non-finite statistic in reward response");
            return Err(Error::NonFiniteStatistic { arm });
        }
        Ok(pending)
    }

    /// Zero every arm's usage count and last known statistic.
    ///
    /// The frame window is left untouched.
    pub fn reset_tallies(&mut self) {
        self.tallies.fill(ArmTally::default());
    }

    pub fn tallies(&self) -> &[ArmTally] {
        &self.tallies
    }

    /// Uses of `arm` since the last consumed report (`None` if out of range).
    pub fn uses_since_last_stats(&self, arm: usize) -> Option<u64> {
        self.tallies.get(arm).map(|t| t.uses_since_last_stats)
    }

    /// Total uses across all arms since the last consumed report.
    pub fn total_uses(&self) -> u64 {
        self.tallies
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.uses_since_last_stats))
    }

    pub fn window(&self) -> FrameWindow {
        FrameWindow {
            min_frame_without_stats: self.min_frame,
            max_frame_without_stats: self.max_frame,
            pending_request_frame: self.pending,
        }
    }

    pub fn pending_request_frame(&self) -> Option<u32> {
        self.pending
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn state(&self) -> AggregatorState {
        if self.awaiting_response {
            AggregatorState::AwaitingResponse
        } else {
            AggregatorState::Idle
        }
    }

    pub fn frame_space(&self) -> FrameSpace {
        self.space
    }

    pub fn config(&self) -> AggregatorConfig {
        self.cfg
    }

    pub fn selector(&self) -> &ArmSelector<P> {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut ArmSelector<P> {
        &mut self.selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SelectorConfig, ThompsonSampling};
    use proptest::prelude::*;

    fn aggregator(cfg: AggregatorConfig) -> DelayedRewardAggregator<ThompsonSampling> {
        let sel = ArmSelector::thompson(SelectorConfig::default(), 0).unwrap();
        DelayedRewardAggregator::init(sel, cfg).unwrap()
    }

    fn eight_bit() -> AggregatorConfig {
        AggregatorConfig {
            frame_bits: 8,
            ..AggregatorConfig::default()
        }
    }

    fn observable(
        agg: &DelayedRewardAggregator<ThompsonSampling>,
    ) -> (Vec<ArmTally>, FrameWindow, AggregatorState, bool, Vec<u64>) {
        (
            agg.tallies().to_vec(),
            agg.window(),
            agg.state(),
            agg.is_report_needed(),
            agg.selector().policy_ref().experience().visits().to_vec(),
        )
    }

    #[test]
    fn init_starts_idle_with_empty_window() {
        let agg = aggregator(AggregatorConfig::default());
        assert!(agg.is_report_needed());
        assert_eq!(agg.state(), AggregatorState::Idle);
        assert_eq!(agg.tallies(), &[ArmTally::default(); 6]);
        let w = agg.window();
        assert_eq!(w.min_frame_without_stats, 0);
        assert_eq!(w.max_frame_without_stats, 0xFFFF);
        assert_eq!(w.pending_request_frame, None);
        assert!(w.is_empty(agg.frame_space()));
    }

    #[test]
    fn init_rejects_bad_frame_width() {
        let sel = ArmSelector::thompson(SelectorConfig::default(), 0).unwrap();
        let cfg = AggregatorConfig {
            frame_bits: 0,
            ..AggregatorConfig::default()
        };
        assert_eq!(
            DelayedRewardAggregator::init(sel, cfg).unwrap_err(),
            Error::InvalidFrameBits(0)
        );
    }

    #[test]
    fn end_to_end_six_arm_report() {
        let mut agg = aggregator(AggregatorConfig::default());
        for _ in 0..3 {
            agg.record_use(2, 10).unwrap();
        }
        agg.record_use(5, 10).unwrap();

        let req = agg.build_reward_request(10);
        assert_eq!(
            req,
            RewardRequest {
                current_frame: 10,
                frame_delta: 10
            }
        );
        assert_eq!(agg.state(), AggregatorState::AwaitingResponse);

        let resp = RewardResponse::new(vec![0.0, 0.0, 9.0, 0.0, 0.0, 4.0]);
        let forwarded = agg.consume_reward_response(&resp).unwrap();
        assert_eq!(forwarded, vec![(2, 3.0), (5, 4.0)]);

        assert_eq!(agg.window().min_frame_without_stats, 11);
        assert!(agg.tallies().iter().all(|t| t.uses_since_last_stats == 0));
        assert_eq!(agg.tallies()[2].last_known_reward_stat, 9.0);
        assert_eq!(agg.state(), AggregatorState::Idle);
        assert!(agg.is_report_needed(), "flag is left to the cadence policy");

        let visits = agg.selector().policy_ref().experience().visits();
        assert_eq!(visits, &[2, 2, 3, 2, 2, 3]);
    }

    #[test]
    fn retransmission_only_moves_pending_frame() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.record_use(0, 4).unwrap();
        let first = agg.build_reward_request(5);
        agg.record_use(1, 6).unwrap();
        let second = agg.build_reward_request(7);

        assert_eq!(first.frame_delta, 5);
        assert_eq!(second.frame_delta, 7);
        let w = agg.window();
        assert_eq!(w.min_frame_without_stats, 0);
        assert_eq!(w.pending_request_frame, Some(7));

        agg.consume_reward_response(&RewardResponse::new(vec![1.0; 6]))
            .unwrap();
        assert_eq!(agg.window().min_frame_without_stats, 8);
    }

    #[test]
    fn wraparound_delta_is_modular() {
        let mut agg = aggregator(AggregatorConfig {
            first_frame: 250,
            ..eight_bit()
        });
        agg.record_use(1, 252).unwrap();
        agg.record_use(1, 3).unwrap();
        assert_eq!(agg.window().max_frame_without_stats, 3);

        let req = agg.build_reward_request(3);
        assert_eq!(req.frame_delta, (3 + 256 - 250) % 256);
        agg.consume_reward_response(&RewardResponse::new(vec![0.0, 2.0, 0.0, 0.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(agg.window().min_frame_without_stats, 4);
    }

    #[test]
    fn window_advance_wraps_at_top_of_space() {
        let mut agg = aggregator(eight_bit());
        agg.record_use(0, 255).unwrap();
        agg.build_reward_request(255);
        agg.consume_reward_response(&RewardResponse::new(vec![1.0; 6]))
            .unwrap();
        let w = agg.window();
        assert_eq!(w.min_frame_without_stats, 0);
        assert!(w.is_empty(agg.frame_space()));
    }

    #[test]
    fn unused_arms_receive_no_reward() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.record_use(4, 1).unwrap();
        agg.build_reward_request(1);
        let forwarded = agg
            .consume_reward_response(&RewardResponse::new(vec![5.0, 5.0, 5.0, 5.0, 8.0, 5.0]))
            .unwrap();
        assert_eq!(forwarded, vec![(4, 8.0)]);
        let visits = agg.selector().policy_ref().experience().visits();
        assert_eq!(visits, &[2, 2, 2, 2, 3, 2]);
    }

    #[test]
    fn total_derivation_forwards_statistic_unchanged() {
        let mut agg = aggregator(AggregatorConfig {
            derivation: RewardDerivation::Total,
            ..AggregatorConfig::default()
        });
        agg.record_use(3, 0).unwrap();
        agg.record_use(3, 1).unwrap();
        agg.build_reward_request(1);
        let forwarded = agg
            .consume_reward_response(&RewardResponse::new(vec![0.0, 0.0, 0.0, 6.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(forwarded, vec![(3, 6.0)]);
    }

    #[test]
    fn malformed_response_changes_nothing() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.record_use(2, 3).unwrap();
        agg.build_reward_request(3);
        let before = observable(&agg);

        assert_eq!(
            agg.consume_reward_response(&RewardResponse::new(vec![1.0; 5])),
            Err(Error::ResponseLength {
                expected: 6,
                got: 5
            })
        );
        assert_eq!(observable(&agg), before);

        let mut stats = vec![1.0; 6];
        stats[4] = f64::NAN;
        assert_eq!(
            agg.consume_reward_response(&RewardResponse::new(stats)),
            Err(Error::NonFiniteStatistic { arm: 4 })
        );
        assert_eq!(observable(&agg), before);
    }

    #[test]
    fn stale_echo_is_rejected() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.record_use(0, 1).unwrap();
        let old = agg.build_reward_request(1);
        let new = agg.build_reward_request(2);
        let before = observable(&agg);

        assert_eq!(
            agg.consume_reward_response(&RewardResponse::answering(&old, vec![1.0; 6])),
            Err(Error::StaleResponse {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(observable(&agg), before);

        agg.consume_reward_response(&RewardResponse::answering(&new, vec![1.0; 6]))
            .unwrap();
        assert_eq!(agg.window().min_frame_without_stats, 3);
    }

    #[test]
    fn response_without_request_is_rejected() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.record_use(0, 0).unwrap();
        let before = observable(&agg);
        assert_eq!(
            agg.consume_reward_response(&RewardResponse::new(vec![0.0; 6])),
            Err(Error::NoPendingRequest)
        );
        assert_eq!(observable(&agg), before);
    }

    #[test]
    fn record_use_rejects_out_of_range_arm() {
        let mut agg = aggregator(AggregatorConfig::default());
        let before = observable(&agg);
        assert_eq!(
            agg.record_use(6, 0),
            Err(Error::ArmOutOfRange { arm: 6, num_arms: 6 })
        );
        assert_eq!(observable(&agg), before);
    }

    #[test]
    fn usage_while_awaiting_is_folded_into_the_report() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.record_use(1, 0).unwrap();
        agg.build_reward_request(0);
        agg.record_use(1, 1).unwrap();
        agg.record_use(1, 2).unwrap();
        assert_eq!(agg.window().max_frame_without_stats, 2);

        let forwarded = agg
            .consume_reward_response(&RewardResponse::new(vec![0.0, 3.0, 0.0, 0.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(forwarded, vec![(1, 1.0)]);
        let w = agg.window();
        assert_eq!(w.min_frame_without_stats, 1);
        assert_eq!(w.max_frame_without_stats, 2);
    }

    #[test]
    fn request_beyond_last_use_keeps_window_consistent() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.record_use(0, 3).unwrap();
        agg.build_reward_request(9);
        agg.consume_reward_response(&RewardResponse::new(vec![1.0; 6]))
            .unwrap();
        let w = agg.window();
        assert_eq!(w.min_frame_without_stats, 10);
        assert_eq!(w.max_frame_without_stats, 9);
        assert!(w.is_empty(agg.frame_space()));
    }

    #[test]
    fn cadence_raises_flag_on_nth_use() {
        let mut agg = aggregator(AggregatorConfig {
            cadence: ReportCadence::EveryUses(3),
            ..AggregatorConfig::default()
        });
        agg.set_report_needed(false);
        agg.record_use(0, 0).unwrap();
        agg.record_use(1, 1).unwrap();
        assert!(!agg.is_report_needed());
        agg.record_use(0, 2).unwrap();
        assert!(agg.is_report_needed());
    }

    #[test]
    fn external_cadence_never_touches_flag() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.set_report_needed(false);
        for f in 0..100 {
            agg.record_use(f as usize % 6, f).unwrap();
        }
        assert!(!agg.is_report_needed());
    }

    #[test]
    fn reset_tallies_keeps_window() {
        let mut agg = aggregator(AggregatorConfig::default());
        agg.record_use(0, 5).unwrap();
        let w = agg.window();
        agg.reset_tallies();
        assert_eq!(agg.total_uses(), 0);
        assert_eq!(agg.window(), w);
    }

    #[test]
    fn max_frame_holds_across_half_space_jump() {
        let mut agg = aggregator(eight_bit());
        agg.record_use(0, 10).unwrap();
        assert_eq!(agg.window().max_frame_without_stats, 10);

        agg.record_use(1, 10 + 128).unwrap();
        assert_eq!(agg.window().max_frame_without_stats, 10);
        assert_eq!(agg.total_uses(), 2);

        agg.record_use(1, 10 + 127).unwrap();
        assert_eq!(agg.window().max_frame_without_stats, 137);

        let req = agg.build_reward_request(140);
        assert_eq!(req.first_frame(agg.frame_space()), 0);
        assert_eq!(req.frame_delta, 140);
    }

    #[test]
    fn derivation_skips_zero_uses() {
        assert_eq!(RewardDerivation::PerUse.derive(10.0, 0), None);
        assert_eq!(RewardDerivation::Total.derive(10.0, 0), None);
        assert_eq!(RewardDerivation::PerUse.derive(10.0, 4), Some(2.5));
    }

    proptest! {
        #[test]
        fn record_use_increments_by_exactly_one(
            uses in proptest::collection::vec((0usize..6, any::<u32>()), 0..200),
        ) {
            let mut agg = aggregator(AggregatorConfig::default());
            let mut expected = [0u64; 6];
            for (arm, frame) in uses {
                agg.record_use(arm, frame).unwrap();
                expected[arm] += 1;
                prop_assert_eq!(agg.uses_since_last_stats(arm), Some(expected[arm]));
            }
        }

        #[test]
        fn frame_delta_matches_modular_formula(
            first in 0u32..256,
            current in 0u32..256,
        ) {
            let mut agg = aggregator(AggregatorConfig { first_frame: first, ..eight_bit() });
            let req = agg.build_reward_request(current);
            prop_assert_eq!(req.frame_delta, (current + 256 - first) % 256);
        }

        #[test]
        fn window_advances_to_pending_plus_one(
            bits in 1u32..=32,
            requests in proptest::collection::vec(any::<u32>(), 1..5),
        ) {
            let mut agg = aggregator(AggregatorConfig { frame_bits: bits, ..AggregatorConfig::default() });
            agg.record_use(0, 0).unwrap();
            let min_before = agg.window().min_frame_without_stats;
            for &r in &requests {
                agg.build_reward_request(r);
                prop_assert_eq!(agg.window().min_frame_without_stats, min_before);
            }
            let pending = agg.pending_request_frame().unwrap();
            agg.consume_reward_response(&RewardResponse::new(vec![1.0; 6])).unwrap();
            let space = agg.frame_space();
            prop_assert_eq!(agg.window().min_frame_without_stats, space.add(pending, 1));
            prop_assert_eq!(agg.total_uses(), 0);
        }
    }
}
