//! Configuration module for refpool.
//!
//! Handles loading configuration from TOML files, CLI arguments
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use refpool_core::config::{IndexerConfig, ReferralConfig, RpcConfig};
use refpool_core::utils::retry::RetryPolicy;
use refpool_sdk::objects::{NetworkId, Protocol};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// HyperSync endpoint for op-mainnet, where the referral registry lives.
pub const DEFAULT_INDEXER_URL: &str = "https://10.hypersync.xyz";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub indexer_url: Option<Url>,
    pub api_token: Option<String>,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub indexer: IndexerConfig,
    pub rpc: RpcConfig,
    pub referrals: ReferralConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Read the TOML file, apply overrides, validate, and build the runtime
    /// configuration.
    ///
    /// A missing file is not an error: every section has defaults, and only
    /// the RPC endpoint has to come from somewhere.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = ?self.config_path, "Config file not found, using defaults");
                FileConfig::default()
            }
            Err(source) => {
                return Err(ConfigError::IoError {
                    path: self.config_path.clone(),
                    source,
                });
            }
        };
        self.build(file_config)
    }

    fn build(&self, mut file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        if let Some(url) = &self.overrides.indexer_url {
            file_config.indexer.url = Some(url.clone());
        }
        if let Some(token) = &self.overrides.api_token {
            file_config.indexer.api_token = Some(token.clone());
        }

        let endpoints = file_config
            .rpc
            .iter()
            .map(|(network, url)| Ok((parse_key::<NetworkId>("rpc", network)?, url.clone())))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let registries = file_config
            .referrals
            .registries
            .iter()
            .map(|(protocol, registry)| {
                Ok((parse_key::<Protocol>("referrals.registries", protocol)?, *registry))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let genesis_blocks = file_config
            .referrals
            .genesis_blocks
            .iter()
            .map(|(protocol, block)| {
                Ok((parse_key::<Protocol>("referrals.genesis_blocks", protocol)?, *block))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        validate(&file_config, &endpoints)?;

        let indexer = file_config.indexer;
        let url = match indexer.url {
            Some(url) => url,
            None => Url::parse(DEFAULT_INDEXER_URL)?,
        };

        Ok(LoadedConfig {
            indexer: IndexerConfig {
                url,
                api_token: indexer.api_token.filter(|t| !t.is_empty()),
                retry: RetryPolicy {
                    page_timeout: Duration::from_secs(indexer.page_timeout_secs),
                    max_retries: indexer.max_retries,
                    base_delay: Duration::from_millis(indexer.retry_base_delay_ms),
                },
            },
            rpc: RpcConfig { endpoints },
            referrals: ReferralConfig {
                network: file_config.referrals.network,
                deployment_block: file_config.referrals.deployment_block,
                genesis_blocks,
                lookback_blocks: file_config.referrals.lookback_blocks,
                registries,
            },
        })
    }
}

fn parse_key<T: std::str::FromStr<Err = refpool_sdk::objects::UnknownIdentifier>>(
    section: &str,
    key: &str,
) -> Result<T, ConfigError> {
    key.parse()
        .map_err(|e| ConfigError::ValidationError(format!("{}: {}", section, e)))
}

fn validate(config: &FileConfig, endpoints: &[(NetworkId, Url)]) -> Result<(), ConfigError> {
    if config.indexer.page_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "indexer.page_timeout_secs must be positive".to_string(),
        ));
    }
    if config.referrals.lookback_blocks == 0 {
        return Err(ConfigError::ValidationError(
            "referrals.lookback_blocks must be positive".to_string(),
        ));
    }
    if !endpoints.iter().any(|(n, _)| *n == config.referrals.network) {
        return Err(ConfigError::ValidationError(format!(
            "no rpc endpoint configured for {}",
            config.referrals.network
        )));
    }
    Ok(())
}
