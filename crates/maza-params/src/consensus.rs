//! Chain parameters for MazaCoin networks

use crate::checkpoints::CheckpointList;
use crate::difficulty::{DifficultyVerifier, MAINNET_RETARGET};
use crate::header::{AncestorLookup, BlockHeader};
use crate::network::{Network, NetworkType};
use crate::{Error, Result};

static MAINNET_PARAMS: ChainParams = ChainParams::mainnet();
static TESTNET_PARAMS: ChainParams = ChainParams::testnet();

/// Chain parameters
///
/// One immutable instance per supported network. The built-in instances are
/// statics and can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainParams {
    /// Network configuration
    pub network: Network,
    /// Difficulty verification policy
    pub verifier: DifficultyVerifier,
    /// Checkpoint table
    pub checkpoints: CheckpointList,
}

impl ChainParams {
    /// Create chain params for mainnet
    pub const fn mainnet() -> Self {
        Self {
            network: Network::mainnet(),
            verifier: DifficultyVerifier::Retarget(MAINNET_RETARGET),
            checkpoints: CheckpointList::mainnet(),
        }
    }

    /// Create chain params for testnet
    ///
    /// Testnet difficulty verification is disabled.
    pub const fn testnet() -> Self {
        Self {
            network: Network::testnet(),
            verifier: DifficultyVerifier::Disabled,
            checkpoints: CheckpointList::testnet(),
        }
    }

    /// Get the shared chain params for a network
    pub fn for_network(network_type: NetworkType) -> &'static ChainParams {
        match network_type {
            NetworkType::Mainnet => &MAINNET_PARAMS,
            NetworkType::Testnet => &TESTNET_PARAMS,
        }
    }

    /// Get the shared chain params for a network name such as `"main"` or `"testnet"`
    pub fn select(name: &str) -> Result<&'static ChainParams> {
        let network_type: NetworkType = name.parse()?;
        Ok(Self::for_network(network_type))
    }

    /// Copy of these params with a different checkpoint table
    pub fn with_checkpoints(&self, checkpoints: CheckpointList) -> ChainParams {
        ChainParams {
            checkpoints,
            ..self.clone()
        }
    }

    /// Network type
    pub fn network_type(&self) -> NetworkType {
        self.network.network_type
    }

    /// Check a header's declared target against the network's retarget policy
    ///
    /// `lookup` should contain at least the last retarget interval of
    /// accepted headers; the transition check is skipped when it doesn't.
    pub fn verify_difficulty<L>(&self, header: &BlockHeader, lookup: &L) -> bool
    where
        L: AncestorLookup + ?Sized,
    {
        self.verifier.verify(header, lookup)
    }

    /// Validate a header against checkpoints, then difficulty
    ///
    /// A header whose hash matches the checkpoint at its height is accepted
    /// outright. A mismatch is reported as [`Error::CheckpointMismatch`],
    /// independent of the difficulty outcome.
    pub fn validate_header<L>(&self, header: &BlockHeader, lookup: &L) -> Result<()>
    where
        L: AncestorLookup + ?Sized,
    {
        if let Some(cp) = self.checkpoints.exact(header.height) {
            if let Err(e) = self.checkpoints.check_header(header) {
                tracing::warn!("{} rejected on {}: {}", header.hash, self.network.name, e);
                return Err(e);
            }
            tracing::debug!("Block {} matches checkpoint at height {}", cp.hash, cp.height);
            return Ok(());
        }

        if !self.verify_difficulty(header, lookup) {
            return Err(Error::DifficultyRejected {
                height: header.height,
                hash: header.hash,
            });
        }

        Ok(())
    }
}
