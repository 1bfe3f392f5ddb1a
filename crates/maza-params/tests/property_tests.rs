//! Property-based tests for maza-params
//!
//! Uses proptest to verify verifier and checkpoint invariants across randomized inputs

use maza_params::difficulty::DIFFICULTY_INTERVAL;
use maza_params::{
    transition_anchor_timestamp, BlockHash, BlockHeader, ChainParams, CheckpointList, NetworkType,
};
use proptest::prelude::*;
use std::collections::HashMap;

// ============================================================================
// Helpers
// ============================================================================

fn hash_for(height: u32) -> BlockHash {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&height.to_le_bytes());
    bytes[31] = 0x77;
    BlockHash::from_bytes(bytes)
}

fn make_header(height: u32, timestamp: u32, target: u32) -> BlockHeader {
    BlockHeader {
        height,
        hash: hash_for(height),
        prev_hash: hash_for(height.wrapping_sub(1)),
        timestamp,
        target,
    }
}

/// Headers for heights `from..=to` with timestamps derived from `seed`
fn window(from: u32, to: u32, seed: u32) -> HashMap<BlockHash, BlockHeader> {
    (from..=to)
        .map(|h| {
            let ts = 1_400_000_000u32.wrapping_add(h.wrapping_mul(seed % 1_200 + 1));
            (hash_for(h), make_header(h, ts, 0x1b0404cb))
        })
        .collect()
}

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary header, including nonsensical field combinations
fn header_strategy() -> impl Strategy<Value = BlockHeader> {
    (any::<u32>(), any::<[u8; 32]>(), any::<[u8; 32]>(), any::<u32>(), any::<u32>()).prop_map(
        |(height, hash, prev, timestamp, target)| BlockHeader {
            height,
            hash: BlockHash::from_bytes(hash),
            prev_hash: BlockHash::from_bytes(prev),
            timestamp,
            target,
        },
    )
}

/// Interval index for a transition boundary, staying clear of u32 overflow
fn interval_index_strategy() -> impl Strategy<Value = u32> {
    1u32..500
}

// ============================================================================
// Difficulty Verifier Properties
// ============================================================================

proptest! {
    /// Property: off-boundary headers never get an anchor timestamp
    #[test]
    fn prop_off_boundary_anchor_is_zero(
        index in interval_index_strategy(),
        offset in 1u32..DIFFICULTY_INTERVAL,
        seed in any::<u32>()
    ) {
        let height = index * DIFFICULTY_INTERVAL + offset;
        let set = window(height.saturating_sub(DIFFICULTY_INTERVAL + 1), height - 1, seed);
        let header = make_header(height, 1_500_000_000, 0x1b0404cb);

        prop_assert_eq!(transition_anchor_timestamp(&header, &set, DIFFICULTY_INTERVAL), 0);
    }

    /// Property: a full window yields the timestamp of the block one interval back
    #[test]
    fn prop_full_window_anchor_is_interval_ancestor(
        index in interval_index_strategy(),
        seed in any::<u32>()
    ) {
        let height = index * DIFFICULTY_INTERVAL;
        let set = window(height - DIFFICULTY_INTERVAL, height - 1, seed);
        let header = make_header(height, 1_500_000_000, 0x1b0404cb);
        let expected = set[&hash_for(height - DIFFICULTY_INTERVAL)].timestamp;

        prop_assert_eq!(transition_anchor_timestamp(&header, &set, DIFFICULTY_INTERVAL), expected);
    }

    /// Property: a window missing any of its oldest blocks yields zero
    #[test]
    fn prop_partial_window_anchor_is_zero(
        index in interval_index_strategy(),
        missing in 1u32..=DIFFICULTY_INTERVAL,
        seed in any::<u32>()
    ) {
        let height = index * DIFFICULTY_INTERVAL;
        let set = window(height - DIFFICULTY_INTERVAL + missing, height - 1, seed);
        let header = make_header(height, 1_500_000_000, 0x1b0404cb);

        prop_assert_eq!(transition_anchor_timestamp(&header, &set, DIFFICULTY_INTERVAL), 0);
    }

    /// Property: testnet accepts every header, whatever the ancestor set holds
    #[test]
    fn prop_testnet_accepts_everything(
        header in header_strategy(),
        seed in any::<u32>(),
        populated in any::<bool>()
    ) {
        let params = ChainParams::for_network(NetworkType::Testnet);
        let set = if populated {
            window(header.height.saturating_sub(10), header.height.saturating_add(10), seed)
        } else {
            HashMap::new()
        };

        prop_assert!(params.verify_difficulty(&header, &set));
    }

    /// Property: verification is a pure function of header and lookup contents
    #[test]
    fn prop_verification_is_deterministic(
        index in interval_index_strategy(),
        offset in 0u32..4,
        target in any::<u32>(),
        seed in any::<u32>()
    ) {
        let params = ChainParams::for_network(NetworkType::Mainnet);
        let height = index * DIFFICULTY_INTERVAL + offset;
        let set = window(height - DIFFICULTY_INTERVAL, height - 1, seed);
        let header = make_header(height, 1_500_000_000, target);

        let first = params.verify_difficulty(&header, &set);
        let second = params.verify_difficulty(&header, &set);
        prop_assert_eq!(first, second);
        prop_assert_eq!(params.verify_difficulty(&header, &set.clone()), first);
    }
}

// ============================================================================
// Checkpoint Properties
// ============================================================================

proptest! {
    /// Property: lookups return the latest checkpoint not above the height
    #[test]
    fn prop_at_or_below_is_tightest(height in any::<u32>()) {
        for checkpoints in [CheckpointList::mainnet(), CheckpointList::testnet()] {
            match checkpoints.at_or_below(height) {
                Some(cp) => {
                    prop_assert!(cp.height <= height);
                    prop_assert!(checkpoints
                        .iter()
                        .all(|other| other.height <= cp.height || other.height > height));
                }
                None => prop_assert!(checkpoints.iter().all(|cp| cp.height > height)),
            }
        }
    }

    /// Property: unordered tables are always rejected
    #[test]
    fn prop_unordered_tables_rejected(heights in prop::collection::vec(any::<u32>(), 2..20)) {
        let template = CheckpointList::mainnet().checkpoints()[0];
        let checkpoints = heights
            .iter()
            .map(|&height| maza_params::Checkpoint { height, ..template })
            .collect::<Vec<_>>();
        let ordered = heights.windows(2).all(|w| w[0] < w[1]);

        prop_assert_eq!(CheckpointList::new(checkpoints).is_ok(), ordered);
    }
}
