//! MazaCoin network parameters and header difficulty checks
//!
//! This crate provides per-network chain parameters, checkpoint data and the
//! proof-of-work retarget verification used by a header-only (SPV) client.
//! Verification only needs a bounded window of previously accepted headers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checkpoints;
pub mod consensus;
pub mod difficulty;
pub mod header;
pub mod network;
pub mod target;

pub use checkpoints::{Checkpoint, CheckpointList};
pub use consensus::ChainParams;
pub use difficulty::{transition_anchor_timestamp, DifficultyVerifier};
pub use header::{AncestorLookup, BlockHash, BlockHeader};
pub use network::{Network, NetworkType, ServiceFlags};
pub use target::{RetargetParams, TargetCheck};

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid network specified
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    /// Checkpoint not found
    #[error("No checkpoint found for height {0}")]
    CheckpointNotFound(u32),

    /// Header sits at a checkpoint height but carries a different hash
    #[error("Checkpoint mismatch at height {height}: expected {expected}, found {found}")]
    CheckpointMismatch {
        /// Checkpoint height
        height: u32,
        /// Hash recorded in the checkpoint table
        expected: BlockHash,
        /// Hash of the offending header
        found: BlockHash,
    },

    /// Declared target is inconsistent with the retarget policy
    #[error("Difficulty check failed for block {hash} at height {height}")]
    DifficultyRejected {
        /// Header height
        height: u32,
        /// Header hash
        hash: BlockHash,
    },

    /// Checkpoint heights are not strictly increasing
    #[error("Checkpoint heights not strictly increasing: {next} follows {previous}")]
    UnorderedCheckpoints {
        /// Height of the earlier entry
        previous: u32,
        /// Height of the entry that breaks the ordering
        next: u32,
    },

    /// Malformed block hash
    #[error("Invalid block hash: {0}")]
    InvalidHash(String),

    /// Malformed configuration data
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O failure while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
