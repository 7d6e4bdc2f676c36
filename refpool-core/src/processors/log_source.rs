//! Log source processor.
//!
//! A log source answers one [`LogQuery`] with one [`LogPage`]. The
//! production implementation talks to a HyperSync endpoint; tests and
//! replays plug in their own implementation of [`LogSource`].

use crate::config::IndexerConfig;
use async_trait::async_trait;
use refpool_sdk::objects::{LogPage, LogQuery, NetworkId, RawLog};
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while talking to a log indexer or an RPC node.
#[derive(Debug, Error)]
pub enum SyncError {
    /// API request error
    #[error("API request error: {0}")]
    Request(#[from] reqwest::Error),

    /// API response parsing error
    #[error("API response parsing error: {0}")]
    Parse(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// API returned an error
    #[error("API error: {message}")]
    ApiError { message: String },

    /// The request did not complete in time
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// No endpoint configured for the network
    #[error("network {0} is not configured")]
    UnsupportedNetwork(NetworkId),
}

/// Source of raw referral logs.
///
/// Implementations return at most one page per call. They must preserve
/// on-chain order inside the page and report where the next page starts.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn get_events(&self, query: &LogQuery) -> Result<LogPage, SyncError>;
}

/// HyperSync-backed log source.
pub struct HyperSyncLogSource {
    url: url::Url,
    api_token: Option<String>,
    http_client: reqwest::Client,
}

impl HyperSyncLogSource {
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            url: config.url.clone(),
            api_token: config.api_token.clone(),
            http_client: reqwest::Client::builder()
                .timeout(config.retry.page_timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    fn build_request(query: &LogQuery) -> HyperSyncQuery {
        let registry = query
            .registry
            .map(|r| vec![r.to_topic()])
            .unwrap_or_default();
        HyperSyncQuery {
            from_block: query.from_block,
            to_block: query.to_block,
            logs: vec![LogSelection {
                topics: vec![vec![query.event_signature.clone()], vec![], registry, vec![]],
            }],
            field_selection: FieldSelection {
                block: &["number", "timestamp"],
                log: &[
                    "block_number",
                    "log_index",
                    "transaction_hash",
                    "data",
                    "topic0",
                    "topic1",
                    "topic2",
                    "topic3",
                ],
            },
        }
    }
}

#[async_trait]
impl LogSource for HyperSyncLogSource {
    async fn get_events(&self, query: &LogQuery) -> Result<LogPage, SyncError> {
        let url = self
            .url
            .join("query")
            .map_err(|e| SyncError::Parse(format!("Invalid indexer URL: {}", e)))?;

        let mut request = self.http_client.post(url).json(&Self::build_request(query));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SyncError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::ApiError {
                message: format!("status {}: {}", status, body),
            });
        }

        let response: HyperSyncResponse = response.json().await?;
        let page = response.into_page()?;

        debug!(
            from_block = query.from_block,
            to_block = query.to_block,
            logs = page.data.len(),
            next_block = page.next_block,
            "Fetched referral log page"
        );

        Ok(page)
    }
}

// API request types for HyperSync
#[derive(Debug, Serialize)]
struct HyperSyncQuery {
    from_block: u64,
    to_block: u64,
    logs: Vec<LogSelection>,
    field_selection: FieldSelection,
}

#[derive(Debug, Serialize)]
struct LogSelection {
    topics: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct FieldSelection {
    block: &'static [&'static str],
    log: &'static [&'static str],
}

// API response types for HyperSync
#[derive(Debug, Deserialize)]
struct HyperSyncResponse {
    #[serde(default)]
    data: Vec<ResponseBatch>,
    #[serde(deserialize_with = "quantity")]
    next_block: u64,
}

#[derive(Debug, Deserialize)]
struct ResponseBatch {
    #[serde(default)]
    blocks: Vec<BlockData>,
    #[serde(default)]
    logs: Vec<LogData>,
}

#[derive(Debug, Deserialize)]
struct BlockData {
    #[serde(deserialize_with = "quantity")]
    number: u64,
    #[serde(deserialize_with = "quantity")]
    timestamp: u64,
}

#[derive(Debug, Deserialize)]
struct LogData {
    #[serde(deserialize_with = "quantity")]
    block_number: u64,
    #[serde(deserialize_with = "quantity")]
    log_index: u64,
    transaction_hash: String,
    #[serde(default)]
    data: String,
    topic0: Option<String>,
    topic1: Option<String>,
    topic2: Option<String>,
    topic3: Option<String>,
}

impl HyperSyncResponse {
    /// Flatten the response batches into a page, joining every log with the
    /// timestamp of its block.
    fn into_page(self) -> Result<LogPage, SyncError> {
        let timestamps: HashMap<u64, u64> = self
            .data
            .iter()
            .flat_map(|batch| batch.blocks.iter())
            .map(|b| (b.number, b.timestamp))
            .collect();

        let mut logs = Vec::new();
        for log in self.data.into_iter().flat_map(|batch| batch.logs) {
            let timestamp = timestamps.get(&log.block_number).ok_or_else(|| {
                SyncError::Parse(format!("Missing block {} for log", log.block_number))
            })?;
            let timestamp = i64::try_from(*timestamp)
                .map_err(|e| SyncError::Parse(format!("Invalid timestamp: {}", e)))?;

            // Topics stop at the first absent one; non-anonymous events always
            // carry topic0.
            let topics: SmallVec<[String; 4]> = [log.topic0, log.topic1, log.topic2, log.topic3]
                .into_iter()
                .map_while(|t| t)
                .collect();

            logs.push(RawLog {
                block_number: log.block_number,
                log_index: log.log_index,
                timestamp,
                transaction_hash: log.transaction_hash,
                data: log.data,
                topics,
            });
        }

        Ok(LogPage {
            data: logs,
            next_block: self.next_block,
        })
    }
}

/// Accept a quantity written as a JSON number, a `0x` hex string or a
/// decimal string.
pub(crate) fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Number(u64),
        Text(String),
    }

    match Quantity::deserialize(deserializer)? {
        Quantity::Number(n) => Ok(n),
        Quantity::Text(s) => parse_quantity(&s).map_err(serde::de::Error::custom),
    }
}

pub(crate) fn parse_quantity(s: &str) -> Result<u64, String> {
    match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid quantity {:?}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_into_page_joins_timestamps() {
        let json = r#"{
            "data": [{
                "blocks": [
                    {"number": 135226237, "timestamp": "0x6812a0b3"},
                    {"number": "0x80f637e", "timestamp": 1746054321}
                ],
                "logs": [
                    {
                        "block_number": 135226237,
                        "log_index": 4,
                        "transaction_hash": "0x51725da9982f5bbec9e9eba728f6ad5d6d81ca302cb43a35d6998cd2e23f707c",
                        "data": "0x",
                        "topic0": "0xfddf272d6cdce612f7757626eff4fda5e235d0da62a22cc77ebe3e295b1479d0",
                        "topic1": "0x0000000000000000000000001234567890abcdef1234567890abcdef12345678",
                        "topic2": "0x0000000000000000000000005f0a55fad9424ac99429f635dfb9bf20c3360ab8",
                        "topic3": "0x0000000000000000000000007890abcdef1234567890abcdef1234567890abcd"
                    },
                    {
                        "block_number": "135226238",
                        "log_index": "0x0",
                        "transaction_hash": "0x7890abcdef1234567890abcdef1234567890abcdef1234567890abcdef123456",
                        "topic0": "0xfddf272d6cdce612f7757626eff4fda5e235d0da62a22cc77ebe3e295b1479d0",
                        "topic1": null
                    }
                ]
            }],
            "next_block": 135226239
        }"#;
        let response: HyperSyncResponse = serde_json::from_str(json).unwrap();
        let page = response.into_page().unwrap();

        assert_eq!(page.next_block, 135226239);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].timestamp, 1746051251);
        assert_eq!(page.data[0].topics.len(), 4);
        assert_eq!(page.data[1].block_number, 135226238);
        assert_eq!(page.data[1].timestamp, 1746054321);
        assert_eq!(page.data[1].topics.len(), 1);
        assert_eq!(page.data[1].data, "");
    }

    #[test]
    fn test_log_without_block_is_rejected() {
        let json = r#"{
            "data": [{"blocks": [], "logs": [{
                "block_number": 1, "log_index": 0, "transaction_hash": "0x00"
            }]}],
            "next_block": 2
        }"#;
        let response: HyperSyncResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(response.into_page(), Err(SyncError::Parse(_))));
    }

    #[test]
    fn test_request_filters_registry_topic() {
        let query = LogQuery {
            from_block: 10,
            to_block: 20,
            event_signature: "0xabc".to_string(),
            registry: Some(
                "0x5f0a55fad9424ac99429f635dfb9bf20c3360ab8".parse().unwrap(),
            ),
        };
        let request = serde_json::to_value(HyperSyncLogSource::build_request(&query)).unwrap();
        assert_eq!(request["from_block"], 10);
        assert_eq!(request["to_block"], 20);
        assert_eq!(request["logs"][0]["topics"][0][0], "0xabc");
        assert_eq!(
            request["logs"][0]["topics"][2][0],
            "0x0000000000000000000000005f0a55fad9424ac99429f635dfb9bf20c3360ab8"
        );
        assert!(request["logs"][0]["topics"][1].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x10").unwrap(), 16);
        assert_eq!(parse_quantity("42").unwrap(), 42);
        assert!(parse_quantity("0xzz").is_err());
    }
}
