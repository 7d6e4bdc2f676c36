//! Block-timestamp resolution.
//!
//! Finds the first block whose timestamp is at or after a given instant by
//! binary-searching block headers over JSON-RPC.

use super::log_source::{SyncError, parse_quantity};
use crate::config::RpcConfig;
use kanau::processor::Processor;
use refpool_sdk::objects::NetworkId;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;

/// Query for the first block at or after `timestamp` on `network`.
///
/// If every existing block is older than `timestamp`, the answer is the
/// next block to be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstBlockAtOrAfter {
    pub network: NetworkId,
    pub timestamp: OffsetDateTime,
}

/// JSON-RPC based block resolver.
pub struct RpcBlockResolver {
    config: RpcConfig,
    http_client: reqwest::Client,
}

impl RpcBlockResolver {
    pub fn new(config: RpcConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        network: NetworkId,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, SyncError> {
        #[derive(Debug, Deserialize)]
        struct RpcResponse<T> {
            result: Option<T>,
            error: Option<RpcError>,
        }

        #[derive(Debug, Deserialize)]
        struct RpcError {
            code: i64,
            message: String,
        }

        let url = self
            .config
            .endpoint(network)
            .ok_or(SyncError::UnsupportedNetwork(network))?;
        let response = self
            .http_client
            .post(url.clone())
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SyncError::RateLimited {
                retry_after_secs: 1,
            });
        }

        let response: RpcResponse<T> = response.json().await?;
        if let Some(error) = response.error {
            return Err(SyncError::ApiError {
                message: format!("{} ({})", error.message, error.code),
            });
        }
        response
            .result
            .ok_or_else(|| SyncError::Parse(format!("{} returned no result", method)))
    }

    async fn latest_block(&self, network: NetworkId) -> Result<u64, SyncError> {
        let number: String = self
            .call(network, "eth_blockNumber", serde_json::json!([]))
            .await?;
        parse_quantity(&number).map_err(SyncError::Parse)
    }

    async fn block_timestamp(&self, network: NetworkId, block: u64) -> Result<i64, SyncError> {
        #[derive(Debug, Deserialize)]
        struct BlockHeader {
            timestamp: String,
        }

        let header: BlockHeader = self
            .call(
                network,
                "eth_getBlockByNumber",
                serde_json::json!([format!("0x{:x}", block), false]),
            )
            .await?;
        let timestamp = parse_quantity(&header.timestamp).map_err(SyncError::Parse)?;
        i64::try_from(timestamp).map_err(|e| SyncError::Parse(format!("Invalid timestamp: {}", e)))
    }
}

impl Processor<FirstBlockAtOrAfter> for RpcBlockResolver {
    type Output = u64;
    type Error = SyncError;
    #[tracing::instrument(skip_all, err, name = "RPC:FirstBlockAtOrAfter")]
    async fn process(&self, query: FirstBlockAtOrAfter) -> Result<u64, SyncError> {
        let target = query.timestamp.unix_timestamp();
        let latest = self.latest_block(query.network).await?;

        if self.block_timestamp(query.network, latest).await? < target {
            return Ok(latest + 1);
        }

        let (mut low, mut high) = (0u64, latest);
        while low < high {
            let mid = low + (high - low) / 2;
            if self.block_timestamp(query.network, mid).await? >= target {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        debug!(
            network = %query.network,
            timestamp = target,
            block = low,
            "Resolved first block at or after timestamp"
        );

        Ok(low)
    }
}
