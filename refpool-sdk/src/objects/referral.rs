use super::address::Address;
use super::blockchains::Protocol;
use serde::{Deserialize, Serialize};

/// One observed on-chain referral attribution.
///
/// Order matters: deduplication keeps the first event per user, so events
/// must arrive in block order and, within a block, in log-index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralEvent {
    pub user_address: Address,
    /// Block timestamp, unix seconds.
    pub timestamp: i64,
    pub referrer_id: Address,
    pub protocol: Protocol,
}
