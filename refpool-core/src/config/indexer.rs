//! Log indexer (HyperSync) configuration.

use crate::utils::retry::RetryPolicy;
use url::Url;

#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Base URL of the HyperSync endpoint for the registry network.
    pub url: Url,
    /// Bearer token sent with every query.
    pub api_token: Option<String>,
    pub retry: RetryPolicy,
}
