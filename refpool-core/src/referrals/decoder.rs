//! Decoding of `ReferralRegistered` logs.

use refpool_sdk::objects::{Address, AddressError, Protocol, RawLog, ReferralEvent};
use thiserror::Error;

/// `topic0` of the registry's `ReferralRegistered` event.
pub const REFERRAL_REGISTERED_TOPIC: &str =
    "0xfddf272d6cdce612f7757626eff4fda5e235d0da62a22cc77ebe3e295b1479d0";

const USER_TOPIC: usize = 1;
const REGISTRY_TOPIC: usize = 2;
const REFERRER_TOPIC: usize = 3;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected 4 topics, found {0}")]
    MissingTopics(usize),

    #[error("unexpected event signature {0}")]
    UnexpectedSignature(String),

    #[error("malformed registry topic {0}")]
    MalformedRegistry(String),

    #[error("topic {index} is not an address: {source}")]
    Address {
        index: usize,
        #[source]
        source: AddressError,
    },
}

/// Decode one registry log into a referral event.
///
/// Decoding is strict: a log that cannot be fully decoded is an error, never
/// skipped.
pub fn decode_referral_event(log: &RawLog, protocol: Protocol) -> Result<ReferralEvent, DecodeError> {
    if log.topics.len() < 4 {
        return Err(DecodeError::MissingTopics(log.topics.len()));
    }
    if !log.topics[0].eq_ignore_ascii_case(REFERRAL_REGISTERED_TOPIC) {
        return Err(DecodeError::UnexpectedSignature(log.topics[0].clone()));
    }
    let registry = &log.topics[REGISTRY_TOPIC];
    let well_formed = registry
        .strip_prefix("0x")
        .is_some_and(|h| hex::decode_to_slice(h, &mut [0u8; 32]).is_ok());
    if !well_formed {
        return Err(DecodeError::MalformedRegistry(registry.clone()));
    }

    let address_at = |index: usize| {
        Address::from_topic(&log.topics[index]).map_err(|source| DecodeError::Address { index, source })
    };

    Ok(ReferralEvent {
        user_address: address_at(USER_TOPIC)?,
        timestamp: log.timestamp,
        referrer_id: address_at(REFERRER_TOPIC)?,
        protocol,
    })
}
