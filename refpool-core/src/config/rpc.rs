//! JSON-RPC endpoints used for block-timestamp resolution.

use refpool_sdk::objects::NetworkId;
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct RpcConfig {
    /// Stored as a `Vec` because only a handful of networks are configured.
    pub endpoints: Vec<(NetworkId, Url)>,
}

impl RpcConfig {
    pub fn endpoint(&self, network: NetworkId) -> Option<&Url> {
        self.endpoints
            .iter()
            .find(|(n, _)| *n == network)
            .map(|(_, url)| url)
    }
}
