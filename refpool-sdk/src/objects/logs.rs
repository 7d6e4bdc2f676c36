//! Log-source contract.
//!
//! A log source answers a [`LogQuery`] with one [`LogPage`]: the logs it
//! could return for a prefix of the range plus the block to continue from.

use super::address::Address;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Request for one page of logs in `[from_block, to_block)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub from_block: u64,
    pub to_block: u64,
    /// `topic0` of the event to match.
    pub event_signature: String,
    /// When set, only logs whose second indexed argument equals this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<Address>,
}

/// A raw log joined with its block timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub block_number: u64,
    pub log_index: u64,
    /// Block timestamp, unix seconds.
    pub timestamp: i64,
    pub transaction_hash: String,
    pub data: String,
    /// `topics[0]` is the event signature; 1..=3 hold indexed arguments.
    pub topics: SmallVec<[String; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    pub data: Vec<RawLog>,
    pub next_block: u64,
}
