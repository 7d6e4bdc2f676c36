//! Shared types for refpool.
//!
//! Everything that crosses a boundary lives here: addresses, referral
//! events, KPI and reward rows, the log-source wire format and the Safe
//! batch document handed to the multisig.

pub mod objects;

pub use primitive_types::{U256, U512};
