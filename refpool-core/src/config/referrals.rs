//! Referral registry configuration.

use refpool_sdk::objects::{Address, NetworkId, Protocol};

/// Block at which the referral registry was deployed on op-mainnet.
pub const REGISTRY_DEPLOYMENT_BLOCK: u64 = 134_945_942;

/// Roughly seven days of 2-second blocks.
pub const DEFAULT_LOOKBACK_BLOCKS: u64 = 302_400;

#[derive(Debug, Clone)]
pub struct ReferralConfig {
    /// Network the registry emits its events on.
    pub network: NetworkId,
    /// First block that can hold a referral event.
    pub deployment_block: u64,
    /// Per-protocol first block, for protocols whose campaign started after
    /// the registry was deployed.
    pub genesis_blocks: Vec<(Protocol, u64)>,
    /// How far back a fetch without an explicit start looks.
    pub lookback_blocks: u64,
    /// Per-protocol registry identifiers used to filter topic 2.
    pub registries: Vec<(Protocol, Address)>,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            network: NetworkId::OpMainnet,
            deployment_block: REGISTRY_DEPLOYMENT_BLOCK,
            genesis_blocks: Vec::new(),
            lookback_blocks: DEFAULT_LOOKBACK_BLOCKS,
            registries: Vec::new(),
        }
    }
}

impl ReferralConfig {
    pub fn registry(&self, protocol: Protocol) -> Option<Address> {
        self.registries
            .iter()
            .find(|(p, _)| *p == protocol)
            .map(|(_, registry)| *registry)
    }

    /// First block to scan for `protocol` when fetching its full history.
    ///
    /// Never earlier than the registry deployment.
    pub fn genesis_block(&self, protocol: Protocol) -> u64 {
        self.genesis_blocks
            .iter()
            .find(|(p, _)| *p == protocol)
            .map_or(self.deployment_block, |(_, block)| {
                (*block).max(self.deployment_block)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_block_falls_back_to_deployment() {
        let config = ReferralConfig {
            genesis_blocks: vec![
                (Protocol::LiskV0, 136_000_000),
                (Protocol::Beefy, 1),
            ],
            ..ReferralConfig::default()
        };
        assert_eq!(config.genesis_block(Protocol::LiskV0), 136_000_000);
        assert_eq!(config.genesis_block(Protocol::Beefy), REGISTRY_DEPLOYMENT_BLOCK);
        assert_eq!(
            config.genesis_block(Protocol::CeloTransactions),
            REGISTRY_DEPLOYMENT_BLOCK
        );
    }
}
