//! Compact target retarget arithmetic

use crate::header::BlockHeader;

/// Limit on how far a single retarget may move the target (x4 either way)
pub const RETARGETING_FACTOR: u32 = 4;

/// Checks a header's declared target against its parent
///
/// `transition_time` is the timestamp of the block that opened the current
/// retarget interval, or `0` when that block is unknown. Implementations must
/// treat `0` as "skip the transition arithmetic" and fall back to the
/// non-transition check against `previous`.
pub trait TargetCheck {
    /// Returns `true` when the declared target is acceptable
    fn check_target(
        &self,
        header: &BlockHeader,
        previous: Option<&BlockHeader>,
        transition_time: u32,
    ) -> bool;
}

/// Retarget policy for a network that recomputes difficulty every `interval` blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetargetParams {
    /// Blocks between difficulty recalculations
    pub interval: u32,
    /// Expected duration of one interval in seconds; must be a multiple of 256
    pub target_timespan: u32,
    /// Easiest permitted target, compact encoding
    pub max_proof_of_work: u32,
}

impl RetargetParams {
    /// Check if a header at this height closes a retarget interval
    pub const fn is_transition(&self, height: u32) -> bool {
        height % self.interval == 0
    }

    /// Shortest timespan honoured by a retarget
    pub const fn min_timespan(&self) -> u32 {
        self.target_timespan / RETARGETING_FACTOR
    }

    /// Longest timespan honoured by a retarget
    pub const fn max_timespan(&self) -> u32 {
        self.target_timespan * RETARGETING_FACTOR
    }

    /// Compute the compact target expected after a transition
    ///
    /// `previous_time - transition_time` is clamped to
    /// [`min_timespan`](Self::min_timespan), [`max_timespan`](Self::max_timespan)
    /// and the result is capped at `max_proof_of_work`.
    pub fn retarget(&self, previous_target: u32, previous_time: u32, transition_time: u32) -> u32 {
        // subtract in signed 64 bit space so a timestamp going backwards can't underflow
        let timespan = (i64::from(previous_time) - i64::from(transition_time))
            .clamp(i64::from(self.min_timespan()), i64::from(self.max_timespan()));

        let mut size = i64::from(previous_target >> 24);
        let mut mantissa = u64::from(previous_target & 0x00ff_ffff);

        // target_timespan is a multiple of 256, so dividing by target_timespan / 256
        // and dropping one byte of size is exact
        mantissa *= timespan as u64;
        mantissa /= u64::from(self.target_timespan >> 8);
        size -= 1;

        while size < 1 || mantissa > 0x007f_ffff {
            mantissa >>= 8;
            size += 1;
        }

        let compact = ((size as u64) << 24) | mantissa;
        compact.min(u64::from(self.max_proof_of_work)) as u32
    }
}

impl TargetCheck for RetargetParams {
    fn check_target(
        &self,
        header: &BlockHeader,
        previous: Option<&BlockHeader>,
        transition_time: u32,
    ) -> bool {
        let Some(previous) = previous else {
            return false;
        };

        if header.prev_hash != previous.hash || header.height != previous.height.wrapping_add(1) {
            return false;
        }

        if self.is_transition(header.height) && transition_time != 0 {
            header.target == self.retarget(previous.target, previous.timestamp, transition_time)
        } else {
            header.target == previous.target
        }
    }
}
