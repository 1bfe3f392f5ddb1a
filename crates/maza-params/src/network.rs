//! MazaCoin network definitions

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// Network type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Mainnet
    #[serde(alias = "main")]
    Mainnet,
    /// Testnet
    #[serde(alias = "test")]
    Testnet,
}

impl NetworkType {
    /// Every supported network
    pub const ALL: [NetworkType; 2] = [NetworkType::Mainnet, NetworkType::Testnet];

    /// Canonical lower-case name
    pub const fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "mainnet",
            NetworkType::Testnet => "testnet",
        }
    }

    /// Identify the network a wire message belongs to by its magic number
    pub fn from_magic(magic: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| Network::from_type(*ty).magic_number == magic)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(NetworkType::Mainnet),
            "test" | "testnet" => Ok(NetworkType::Testnet),
            _ => Err(Error::InvalidNetwork(s.to_string())),
        }
    }
}

/// Advertised peer capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceFlags(u64);

impl ServiceFlags {
    /// No services
    pub const NONE: ServiceFlags = ServiceFlags(0);
    /// Serves the full block chain
    pub const NODE_NETWORK: ServiceFlags = ServiceFlags(1);
    /// Supports bloom-filtered connections
    pub const NODE_BLOOM: ServiceFlags = ServiceFlags(1 << 2);

    /// Wrap a raw bitmask
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bitmask as sent on the wire
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Check whether every flag in `other` is set
    pub const fn contains(&self, other: ServiceFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ServiceFlags {
    type Output = ServiceFlags;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Network configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Network type
    pub network_type: NetworkType,
    /// Human-readable name
    pub name: &'static str,
    /// DNS seed hostnames, in resolution order
    pub dns_seeds: &'static [&'static str],
    /// P2P port
    pub standard_port: u16,
    /// Wire-protocol message tag
    pub magic_number: u32,
    /// Services advertised to peers
    pub services: ServiceFlags,
}

impl Network {
    /// Get mainnet parameters
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            name: "mainnet",
            dns_seeds: &["mazacoin.org"],
            standard_port: 12835,
            magic_number: 0xdf03b5f8,
            services: ServiceFlags::NODE_NETWORK,
        }
    }

    /// Get testnet parameters
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            name: "testnet",
            dns_seeds: &["mazatest.cryptoadhd.com"],
            standard_port: 11835,
            magic_number: 0x01a9fe05,
            services: ServiceFlags::NODE_NETWORK,
        }
    }

    /// Get network by type
    pub const fn from_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::testnet(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_params() {
        let net = Network::mainnet();
        assert_eq!(net.network_type, NetworkType::Mainnet);
        assert_eq!(net.standard_port, 12835);
        assert_eq!(net.magic_number, 0xdf03b5f8);
        assert_eq!(net.dns_seeds, &["mazacoin.org"]);
        assert!(net.services.contains(ServiceFlags::NODE_NETWORK));
        assert!(!net.services.contains(ServiceFlags::NODE_BLOOM));
    }

    #[test]
    fn test_network_from_type() {
        let net = Network::from_type(NetworkType::Testnet);
        assert_eq!(net.network_type, NetworkType::Testnet);
        assert_eq!(net.standard_port, 11835);
    }

    #[test]
    fn test_parse_network_names() {
        assert_eq!("main".parse::<NetworkType>().unwrap(), NetworkType::Mainnet);
        assert_eq!("MainNet".parse::<NetworkType>().unwrap(), NetworkType::Mainnet);
        assert_eq!("test".parse::<NetworkType>().unwrap(), NetworkType::Testnet);
        assert!(matches!(
            "regtest".parse::<NetworkType>(),
            Err(Error::InvalidNetwork(name)) if name == "regtest"
        ));
    }

    #[test]
    fn test_network_type_serde() {
        assert_eq!(serde_json::to_string(&NetworkType::Testnet).unwrap(), "\"testnet\"");
        let ty: NetworkType = serde_json::from_str("\"main\"").unwrap();
        assert_eq!(ty, NetworkType::Mainnet);
        assert!(serde_json::from_str::<NetworkType>("\"signet\"").is_err());
    }

    #[test]
    fn test_from_magic() {
        assert_eq!(NetworkType::from_magic(0xdf03b5f8), Some(NetworkType::Mainnet));
        assert_eq!(NetworkType::from_magic(0x01a9fe05), Some(NetworkType::Testnet));
        assert_eq!(NetworkType::from_magic(0xd9b4bef9), None);
    }

    #[test]
    fn test_service_flags() {
        let flags = ServiceFlags::NODE_NETWORK | ServiceFlags::NODE_BLOOM;
        assert_eq!(flags.bits(), 5);
        assert!(flags.contains(ServiceFlags::NODE_BLOOM));
        assert!(flags.contains(ServiceFlags::NONE));
        assert_eq!(ServiceFlags::from_bits(1), ServiceFlags::NODE_NETWORK);
    }
}
