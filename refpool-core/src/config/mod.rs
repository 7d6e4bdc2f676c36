//! Runtime configuration types.
//!
//! These are the validated values the engine runs with. Loading and parsing
//! the configuration file is handled by the binary.

mod indexer;
mod referrals;
mod rpc;

pub use indexer::IndexerConfig;
pub use referrals::{ReferralConfig, REGISTRY_DEPLOYMENT_BLOCK, DEFAULT_LOOKBACK_BLOCKS};
pub use rpc::RpcConfig;
