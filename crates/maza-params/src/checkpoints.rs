//! Blockchain checkpoints for partial sync and hard header validation
//!
//! Checkpoints double as starting points for partial chain downloads, so the
//! built-in tables only contain blocks the client can anchor a sync on.

use crate::header::{BlockHash, BlockHeader};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

/// Safety margin between a wallet birthday and the checkpoint a sync starts from
pub const BIRTHDAY_MARGIN_SECS: i64 = 7 * 24 * 60 * 60;

/// A blockchain checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Block height
    pub height: u32,
    /// Block hash
    pub hash: BlockHash,
    /// Timestamp (Unix epoch)
    pub timestamp: u32,
    /// Target in compact encoding
    pub target: u32,
}

impl Checkpoint {
    const fn new(height: u32, hash: &str, timestamp: u32, target: u32) -> Self {
        Self {
            height,
            hash: BlockHash::from_hex_const(hash),
            timestamp,
            target,
        }
    }

    /// Block time as a UTC datetime
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.timestamp), 0)
    }
}

const MAINNET_CHECKPOINTS: &[Checkpoint] = &[
    Checkpoint::new(0, "00000c7c73d8ce604178dae13f0fc6ec0be3275614366d44b1b4b5c6e238c60c", 1390747675, 0x1e0ffff0),
    Checkpoint::new(91_800, "00000000000000f35417a67ff0bb5cec6a1c64d13bb1359ae4a03d2c9d44d900", 1403364920, 0x1a2083d6),
    Checkpoint::new(183_600, "0000000000000787f10fa4a547822f8170f1f182ca0de60ecd2de189471da885", 1415237368, 0x1a259a07),
    Checkpoint::new(700_000, "000000000000018674cd89025fc8190e5fc1a558dce38392e43f3603cb1cb192", 1480586887, 0x1a026de3),
    Checkpoint::new(750_000, "0000000000000024a619312835504165c91b817a50ee724fc3f2a48565fdb555", 1486902764, 0x1a0256dd),
    Checkpoint::new(800_000, "000000000000010c0245a794d16023ffb7a0e5f0fceb991e9f15706e711272de", 1493405361, 0x1a01bc8e),
    Checkpoint::new(850_000, "000000000000025553ea305539a442cfa620d5224252f641f5250a52b53cdea7", 1499985075, 0x1a0285c4),
    Checkpoint::new(870_000, "00000000000004386593649e6ad9a2ed3153710d94a55bf8dfa630baf53ec5ec", 1502541642, 0x1a04a3aa),
];

const TESTNET_CHECKPOINTS: &[Checkpoint] = &[
    Checkpoint::new(261, "00000c26026d0815a7e2ce4fa270775f61403c040647ff2c3091f99e894a4618", 1423410572, 0x1e0ffff0),
    Checkpoint::new(3_000, "0000013ee65b53f805d6d7e9384a4cba59bdc97f2de0d216f40aba9aac7c5809", 1462856602, 0x1e015555),
    Checkpoint::new(6_000, "0000002f95bdd3f7f85fceeb9091886dea8e1f6cb189765fb828b9c64064fd6c", 1463327199, 0x1d4a220e),
];

const fn strictly_increasing(checkpoints: &[Checkpoint]) -> bool {
    let mut i = 1;
    while i < checkpoints.len() {
        if checkpoints[i].height <= checkpoints[i - 1].height {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(strictly_increasing(MAINNET_CHECKPOINTS));
const _: () = assert!(strictly_increasing(TESTNET_CHECKPOINTS));

/// Ordered list of checkpoints for one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointList {
    checkpoints: Cow<'static, [Checkpoint]>,
}

impl CheckpointList {
    /// Create a checkpoint list, rejecting heights that are not strictly increasing
    pub fn new(checkpoints: Vec<Checkpoint>) -> Result<Self> {
        if let Some(pair) = checkpoints.windows(2).find(|w| w[1].height <= w[0].height) {
            return Err(Error::UnorderedCheckpoints {
                previous: pair[0].height,
                next: pair[1].height,
            });
        }

        Ok(Self {
            checkpoints: Cow::Owned(checkpoints),
        })
    }

    /// Get mainnet checkpoints
    pub const fn mainnet() -> Self {
        Self {
            checkpoints: Cow::Borrowed(MAINNET_CHECKPOINTS),
        }
    }

    /// Get testnet checkpoints
    pub const fn testnet() -> Self {
        Self {
            checkpoints: Cow::Borrowed(TESTNET_CHECKPOINTS),
        }
    }

    /// Parse a JSON array of checkpoints
    pub fn from_json_str(json: &str) -> Result<Self> {
        let checkpoints: Vec<Checkpoint> = serde_json::from_str(json)?;
        Self::new(checkpoints)
    }

    /// Load a JSON array of checkpoints from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Latest checkpoint at or below `height`
    pub fn at_or_below(&self, height: u32) -> Option<&Checkpoint> {
        let idx = self.checkpoints.partition_point(|cp| cp.height <= height);
        idx.checked_sub(1).map(|i| &self.checkpoints[i])
    }

    /// Get checkpoint at or before given height
    pub fn checkpoint_at_height(&self, height: u32) -> Result<&Checkpoint> {
        self.at_or_below(height)
            .ok_or(Error::CheckpointNotFound(height))
    }

    /// Checkpoint recorded at exactly `height`
    pub fn exact(&self, height: u32) -> Option<&Checkpoint> {
        self.checkpoints
            .binary_search_by_key(&height, |cp| cp.height)
            .ok()
            .map(|i| &self.checkpoints[i])
    }

    /// Reject a header that sits at a checkpoint height with a different hash
    pub fn check_header(&self, header: &BlockHeader) -> Result<()> {
        match self.exact(header.height) {
            Some(cp) if cp.hash != header.hash => Err(Error::CheckpointMismatch {
                height: cp.height,
                expected: cp.hash,
                found: header.hash,
            }),
            _ => Ok(()),
        }
    }

    /// Checkpoint to start a partial sync from for a wallet created at `birthday`
    ///
    /// Picks the latest checkpoint more than a week older than the birthday,
    /// falling back to the first checkpoint.
    pub fn sync_start_for_birthday(&self, birthday: DateTime<Utc>) -> Option<&Checkpoint> {
        let cutoff = birthday.timestamp() - BIRTHDAY_MARGIN_SECS;
        self.checkpoints
            .iter()
            .rev()
            .find(|cp| i64::from(cp.timestamp) < cutoff)
            .or_else(|| self.checkpoints.first())
    }

    /// Get all checkpoints
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Iterate checkpoints in height order
    pub fn iter(&self) -> std::slice::Iter<'_, Checkpoint> {
        self.checkpoints.iter()
    }

    /// Get latest checkpoint
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    /// Get checkpoint count
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}
