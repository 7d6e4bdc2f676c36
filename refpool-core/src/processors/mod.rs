//! I/O processors.
//!
//! - `LogSource`: answers a `LogQuery` with one page of raw referral logs
//! - `RpcBlockResolver`: maps a timestamp to the first block at or after it

pub mod block_resolver;
pub mod log_source;

pub use block_resolver::{FirstBlockAtOrAfter, RpcBlockResolver};
pub use log_source::{HyperSyncLogSource, LogSource, SyncError};
