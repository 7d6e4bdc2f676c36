use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownIdentifier {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// All networks refpool can resolve blocks on
pub enum NetworkId {
    #[serde(rename = "celo-mainnet")]
    CeloMainnet,
    #[serde(rename = "ethereum-mainnet")]
    EthereumMainnet,
    #[serde(rename = "arbitrum-one")]
    ArbitrumOne,
    #[serde(rename = "op-mainnet")]
    OpMainnet,
    #[serde(rename = "polygon-pos-mainnet")]
    PolygonPosMainnet,
    #[serde(rename = "base-mainnet")]
    BaseMainnet,
    #[serde(rename = "lisk-mainnet")]
    LiskMainnet,
    #[serde(rename = "avalanche-mainnet")]
    AvalancheMainnet,
    #[serde(rename = "ink-mainnet")]
    InkMainnet,
    #[serde(rename = "unichain-mainnet")]
    UnichainMainnet,
    #[serde(rename = "berachain-mainnet")]
    BerachainMainnet,
}

impl NetworkId {
    pub const ALL: [NetworkId; 11] = [
        NetworkId::CeloMainnet,
        NetworkId::EthereumMainnet,
        NetworkId::ArbitrumOne,
        NetworkId::OpMainnet,
        NetworkId::PolygonPosMainnet,
        NetworkId::BaseMainnet,
        NetworkId::LiskMainnet,
        NetworkId::AvalancheMainnet,
        NetworkId::InkMainnet,
        NetworkId::UnichainMainnet,
        NetworkId::BerachainMainnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::CeloMainnet => "celo-mainnet",
            NetworkId::EthereumMainnet => "ethereum-mainnet",
            NetworkId::ArbitrumOne => "arbitrum-one",
            NetworkId::OpMainnet => "op-mainnet",
            NetworkId::PolygonPosMainnet => "polygon-pos-mainnet",
            NetworkId::BaseMainnet => "base-mainnet",
            NetworkId::LiskMainnet => "lisk-mainnet",
            NetworkId::AvalancheMainnet => "avalanche-mainnet",
            NetworkId::InkMainnet => "ink-mainnet",
            NetworkId::UnichainMainnet => "unichain-mainnet",
            NetworkId::BerachainMainnet => "berachain-mainnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkId::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| UnknownIdentifier {
                kind: "network",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Protocols that run referral campaigns
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    Beefy,
    Aerodrome,
    Somm,
    CeloPg,
    Arbitrum,
    Velodrome,
    Fonbnk,
    Aave,
    CeloTransactions,
    Rhino,
    ScoutGameV0,
    LiskV0,
    TetherV0,
    BaseV0,
}

impl Protocol {
    pub const ALL: [Protocol; 14] = [
        Protocol::Beefy,
        Protocol::Aerodrome,
        Protocol::Somm,
        Protocol::CeloPg,
        Protocol::Arbitrum,
        Protocol::Velodrome,
        Protocol::Fonbnk,
        Protocol::Aave,
        Protocol::CeloTransactions,
        Protocol::Rhino,
        Protocol::ScoutGameV0,
        Protocol::LiskV0,
        Protocol::TetherV0,
        Protocol::BaseV0,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Beefy => "beefy",
            Protocol::Aerodrome => "aerodrome",
            Protocol::Somm => "somm",
            Protocol::CeloPg => "celo-pg",
            Protocol::Arbitrum => "arbitrum",
            Protocol::Velodrome => "velodrome",
            Protocol::Fonbnk => "fonbnk",
            Protocol::Aave => "aave",
            Protocol::CeloTransactions => "celo-transactions",
            Protocol::Rhino => "rhino",
            Protocol::ScoutGameV0 => "scout-game-v0",
            Protocol::LiskV0 => "lisk-v0",
            Protocol::TetherV0 => "tether-v0",
            Protocol::BaseV0 => "base-v0",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Protocol::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownIdentifier {
                kind: "protocol",
                value: s.to_string(),
            })
    }
}
