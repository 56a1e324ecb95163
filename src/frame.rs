//! Bounded, wrapping frame-counter arithmetic.
//!
//! Frame counters on the air are fixed-width (LoRaWAN uplink `FCnt` is sent as
//! 16 bits) and wrap at a power of two. All deltas and orderings between frame
//! numbers go through [`FrameSpace`] so that wraparound never produces a
//! negative or overflowed window length.
//!
//! Ordering uses serial-number comparison: `a` is newer than `b` when the
//! forward distance from `b` to `a` is non-zero and less than half the space.

use crate::error::{Error, Result};

/// A frame-counter space of size `2^bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameSpace {
    bits: u32,
}

impl FrameSpace {
    /// 16-bit counter space (LoRaWAN `FCnt` as transmitted).
    pub const FCNT16: FrameSpace = FrameSpace { bits: 16 };

    /// Create a space of `2^bits` frame numbers. `bits` must be in `1..=32`.
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > 32 {
            return Err(Error::InvalidFrameBits(bits));
        }
        Ok(Self { bits })
    }

    /// Counter width in bits.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of distinct frame numbers (`2^bits`).
    pub fn modulus(&self) -> u64 {
        1u64 << self.bits
    }

    #[inline]
    fn mask(&self) -> u64 {
        self.modulus() - 1
    }

    /// Reduce an arbitrary counter value into the space.
    #[inline]
    pub fn wrap(&self, x: u32) -> u32 {
        (u64::from(x) & self.mask()) as u32
    }

    /// Forward distance from `b` to `a`: `(a - b) mod 2^bits`.
    #[inline]
    pub fn sub(&self, a: u32, b: u32) -> u32 {
        (u64::from(a).wrapping_sub(u64::from(b)) & self.mask()) as u32
    }

    /// `(a + n) mod 2^bits`.
    #[inline]
    pub fn add(&self, a: u32, n: u32) -> u32 {
        ((u64::from(a) + u64::from(n)) & self.mask()) as u32
    }

    /// Whether `a` comes strictly after `b` under serial-number comparison.
    pub fn is_newer(&self, a: u32, b: u32) -> bool {
        let d = u64::from(self.sub(a, b));
        d != 0 && d < self.modulus() / 2
    }

    /// The newer of `a` and `b` (returns `a` when they are equal).
    ///
    /// When `b` is exactly half the space ahead of `a`, or further, neither
    /// counts as newer and `a` is kept.
    pub fn max(&self, a: u32, b: u32) -> u32 {
        if self.is_newer(b, a) {
            self.wrap(b)
        } else {
            self.wrap(a)
        }
    }
}

impl Default for FrameSpace {
    fn default() -> Self {
        Self::FCNT16
    }
}
