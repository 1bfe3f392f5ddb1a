//! Block header summaries and ancestor lookup
//!
//! Header parsing and hashing live elsewhere. This module only models the
//! fields the difficulty checks read, and the capability used to walk back
//! through headers the client has already accepted.

use crate::{Error, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

/// 256-bit block identifier
///
/// Bytes are kept in wire (little-endian) order. Hex strings are read and
/// written in the reversed, human-readable order used by block explorers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    /// The all-zero hash (parent of a genesis block)
    pub const ZERO: BlockHash = BlockHash([0u8; 32]);

    /// Wrap raw bytes in wire order
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes in wire order
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a display-order hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::InvalidHash(format!("{}: {}", s, e)))?;
        bytes.reverse();
        Ok(Self(bytes))
    }

    /// Parse a display-order hex literal at compile time
    ///
    /// Panics on malformed input, which turns into a build error when used
    /// to initialise a `const` or `static`.
    pub const fn from_hex_const(s: &str) -> Self {
        let digits = s.as_bytes();
        assert!(digits.len() == 64, "block hash literal must be 64 hex digits");

        let mut bytes = [0u8; 32];
        let mut i = 0;
        while i < 32 {
            bytes[31 - i] = (hex_nibble(digits[2 * i]) << 4) | hex_nibble(digits[2 * i + 1]);
            i += 1;
        }
        Self(bytes)
    }

    /// Check for the all-zero hash
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in block hash literal"),
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut display = self.0;
        display.reverse();
        f.write_str(&hex::encode(display))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self)
    }
}

impl FromStr for BlockHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

/// The header fields read by checkpoint and difficulty checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block height
    pub height: u32,
    /// Hash of this header
    pub hash: BlockHash,
    /// Hash of the parent header
    pub prev_hash: BlockHash,
    /// Timestamp (Unix epoch seconds)
    pub timestamp: u32,
    /// Declared target in compact encoding
    pub target: u32,
}

/// Read-only view of previously accepted headers, keyed by hash
///
/// The set is never assumed to be complete. Callers must keep it stable for
/// the duration of a single verification call.
pub trait AncestorLookup {
    /// Resolve a hash to an accepted header
    fn get(&self, hash: &BlockHash) -> Option<&BlockHeader>;
}

impl<S: BuildHasher> AncestorLookup for HashMap<BlockHash, BlockHeader, S> {
    fn get(&self, hash: &BlockHash) -> Option<&BlockHeader> {
        HashMap::get(self, hash)
    }
}

impl AncestorLookup for BTreeMap<BlockHash, BlockHeader> {
    fn get(&self, hash: &BlockHash) -> Option<&BlockHeader> {
        BTreeMap::get(self, hash)
    }
}

impl<L: AncestorLookup + ?Sized> AncestorLookup for &L {
    fn get(&self, hash: &BlockHash) -> Option<&BlockHeader> {
        (**self).get(hash)
    }
}
