//! TOML file configuration structures.
//!
//! These structs directly map to the `refpool.toml` file format.

use refpool_core::config::{DEFAULT_LOOKBACK_BLOCKS, REGISTRY_DEPLOYMENT_BLOCK};
use refpool_sdk::objects::{Address, NetworkId};
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub indexer: IndexerConfig,
    /// JSON-RPC endpoint per network, e.g. `op-mainnet = "https://..."`.
    #[serde(default)]
    pub rpc: BTreeMap<String, Url>,
    #[serde(default)]
    pub referrals: ReferralsConfig,
}

/// HyperSync indexer section.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// Defaults to the op-mainnet HyperSync endpoint.
    #[serde(default)]
    pub url: Option<Url>,
    /// Can also be supplied through `HYPERSYNC_API_TOKEN`.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_token: None,
            page_timeout_secs: default_page_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

/// Referral registry section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferralsConfig {
    #[serde(default = "default_network")]
    pub network: NetworkId,
    #[serde(default = "default_deployment_block")]
    pub deployment_block: u64,
    #[serde(default = "default_lookback_blocks")]
    pub lookback_blocks: u64,
    /// Registry identifier per protocol, e.g. `celo-transactions = "0x..."`.
    #[serde(default)]
    pub registries: BTreeMap<String, Address>,
    /// First block per protocol for `--include-all`, e.g. `lisk-v0 = 135000000`.
    #[serde(default)]
    pub genesis_blocks: BTreeMap<String, u64>,
}

impl Default for ReferralsConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            deployment_block: default_deployment_block(),
            lookback_blocks: default_lookback_blocks(),
            registries: BTreeMap::new(),
            genesis_blocks: BTreeMap::new(),
        }
    }
}

fn default_page_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    4
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

fn default_network() -> NetworkId {
    NetworkId::OpMainnet
}

fn default_deployment_block() -> u64 {
    REGISTRY_DEPLOYMENT_BLOCK
}

fn default_lookback_blocks() -> u64 {
    DEFAULT_LOOKBACK_BLOCKS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[indexer]
url = "https://hypersync.example.com"
api_token = "token"
page_timeout_secs = 10
max_retries = 2

[rpc]
op-mainnet = "https://mainnet.optimism.io"
celo-mainnet = "https://forno.celo.org"

[referrals]
lookback_blocks = 1000

[referrals.registries]
celo-transactions = "0x5F0A55FAD9424AC99429F635DFB9BF20C3360AB8"

[referrals.genesis_blocks]
lisk-v0 = 135000000
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.indexer.url.unwrap().as_str(),
            "https://hypersync.example.com/"
        );
        assert_eq!(config.indexer.api_token.as_deref(), Some("token"));
        assert_eq!(config.indexer.max_retries, 2);
        assert_eq!(config.indexer.retry_base_delay_ms, 500);
        assert_eq!(config.rpc.len(), 2);
        assert!(config.rpc.contains_key("celo-mainnet"));
        assert_eq!(config.referrals.network, NetworkId::OpMainnet);
        assert_eq!(config.referrals.deployment_block, REGISTRY_DEPLOYMENT_BLOCK);
        assert_eq!(config.referrals.lookback_blocks, 1000);
        assert_eq!(
            config.referrals.registries["celo-transactions"].to_string(),
            "0x5f0a55fad9424ac99429f635dfb9bf20c3360ab8"
        );
        assert_eq!(config.referrals.genesis_blocks["lisk-v0"], 135_000_000);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.indexer.url.is_none());
        assert_eq!(config.indexer.page_timeout_secs, 30);
        assert!(config.rpc.is_empty());
        assert_eq!(config.referrals.lookback_blocks, DEFAULT_LOOKBACK_BLOCKS);
    }

    #[test]
    fn test_unknown_network_value_is_rejected() {
        assert!(toml::from_str::<FileConfig>("[referrals]\nnetwork = \"solana\"\n").is_err());
    }
}
