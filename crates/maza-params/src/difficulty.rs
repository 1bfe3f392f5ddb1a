//! Per-network difficulty verification
//!
//! Each supported network carries one [`DifficultyVerifier`] variant. The
//! retarget variant locates the block that opened the current interval by
//! walking back through the caller's [`AncestorLookup`], then hands the
//! header, its parent and the anchor timestamp to a [`TargetCheck`].

use crate::header::{AncestorLookup, BlockHeader};
use crate::target::{RetargetParams, TargetCheck};

/// Blocks between difficulty transitions on mainnet
pub const DIFFICULTY_INTERVAL: u32 = 2016;

/// Expected duration of one mainnet interval (two weeks)
pub const TARGET_TIMESPAN: u32 = 14 * 24 * 60 * 60;

/// Lowest mainnet difficulty, compact encoding (the genesis target)
pub const MAX_PROOF_OF_WORK: u32 = 0x1e0ffff0;

/// Mainnet retarget policy
pub const MAINNET_RETARGET: RetargetParams = RetargetParams {
    interval: DIFFICULTY_INTERVAL,
    target_timespan: TARGET_TIMESPAN,
    max_proof_of_work: MAX_PROOF_OF_WORK,
};

const _: () = assert!(MAINNET_RETARGET.interval > 0);
const _: () = assert!(MAINNET_RETARGET.target_timespan % 256 == 0);

/// Difficulty verification strategy for one network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyVerifier {
    /// Recompute the target on interval boundaries, require it unchanged otherwise
    Retarget(RetargetParams),
    /// Difficulty verification switched off: every header is accepted.
    ///
    /// Only testnet uses this. It is an explicit policy choice for a
    /// low-value network and must never serve as a default for anything else.
    Disabled,
}

impl DifficultyVerifier {
    /// Verify a header's declared target using the network's own retarget arithmetic
    pub fn verify<L>(&self, header: &BlockHeader, lookup: &L) -> bool
    where
        L: AncestorLookup + ?Sized,
    {
        match self {
            Self::Retarget(params) => self.verify_with(header, lookup, params),
            Self::Disabled => skip(header),
        }
    }

    /// Verify a header, delegating the target comparison to `check`
    ///
    /// `lookup` must hold at least the last `interval` headers for the
    /// transition check to run. When it doesn't, `check` receives an anchor
    /// timestamp of `0` and falls back to the non-transition check.
    pub fn verify_with<L, C>(&self, header: &BlockHeader, lookup: &L, check: &C) -> bool
    where
        L: AncestorLookup + ?Sized,
        C: TargetCheck + ?Sized,
    {
        match self {
            Self::Retarget(params) => {
                let anchor_time = transition_anchor_timestamp(header, lookup, params.interval);

                let previous = lookup.get(&header.prev_hash);
                if previous.is_none() {
                    tracing::warn!(
                        "Parent {} of block {} at height {} is not in the ancestor set",
                        header.prev_hash,
                        header.hash,
                        header.height
                    );
                }

                check.check_target(header, previous, anchor_time)
            }
            Self::Disabled => skip(header),
        }
    }

    /// Retarget interval, if this verifier recomputes difficulty
    pub const fn retarget_interval(&self) -> Option<u32> {
        match self {
            Self::Retarget(params) => Some(params.interval),
            Self::Disabled => None,
        }
    }

    /// Check if difficulty verification is switched off
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

fn skip(header: &BlockHeader) -> bool {
    tracing::trace!("Difficulty check skipped for height {}", header.height);
    true
}

/// Timestamp of the block that opened the retarget interval `header` closes
///
/// Returns `0` when `header` is not on an interval boundary, or when any of
/// the `interval` ancestors is missing from `lookup`. The walk performs at
/// most `interval` lookups.
pub fn transition_anchor_timestamp<L>(header: &BlockHeader, lookup: &L, interval: u32) -> u32
where
    L: AncestorLookup + ?Sized,
{
    debug_assert!(interval > 0, "retarget interval must be non-zero");
    if interval == 0 || header.height % interval != 0 {
        return 0;
    }

    let mut anchor = header;
    for step in 0..interval {
        match lookup.get(&anchor.prev_hash) {
            Some(parent) => anchor = parent,
            None => {
                tracing::debug!(
                    "Transition anchor for height {} unavailable: walk stopped after {} of {} blocks",
                    header.height,
                    step,
                    interval
                );
                return 0;
            }
        }
    }

    anchor.timestamp
}
