//! Payloads of the reward request/response exchange.
//!
//! These carry only the semantic content of the MAC commands. Framing and
//! encoding belong to the layer that transports them.

/// Request for aggregated statistics over the most recent `frame_delta` frames
/// ending at `current_frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardRequest {
    pub current_frame: u32,
    /// `(current_frame - min_frame_without_stats) mod 2^bits`.
    pub frame_delta: u32,
}

impl RewardRequest {
    /// First frame covered by the request, given the counter space it was built in.
    pub fn first_frame(&self, space: crate::FrameSpace) -> u32 {
        space.sub(self.current_frame, self.frame_delta)
    }
}

/// Aggregated per-arm statistics, aligned by arm index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardResponse {
    pub stats: Vec<f64>,
    /// Echo of [`RewardRequest::current_frame`] when the peer supplies one.
    ///
    /// When present, the aggregator rejects responses that do not answer the
    /// pending request. When absent, pairing relies on there being a single
    /// outstanding request.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub request_frame: Option<u32>,
}

impl RewardResponse {
    /// Response without a request echo.
    pub fn new(stats: Vec<f64>) -> Self {
        Self {
            stats,
            request_frame: None,
        }
    }

    /// Response that names the request frame it answers.
    pub fn answering(request: &RewardRequest, stats: Vec<f64>) -> Self {
        Self {
            stats,
            request_frame: Some(request.current_frame),
        }
    }
}
