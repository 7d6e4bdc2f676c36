use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte EVM account address.
///
/// Parsing is case-insensitive; the textual form is always lowercase and
/// `0x`-prefixed, so the value doubles as the lowercase key used by the
/// exclusion list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must be 0x followed by 40 hex characters, got {0:?}")]
    InvalidFormat(String),
    #[error("topic must be 0x followed by 64 hex characters, got {0:?}")]
    InvalidTopic(String),
    #[error("topic {0} has non-zero padding above the address bytes")]
    DirtyPadding(String),
}

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Extract an address from a 32-byte indexed event topic.
    ///
    /// Indexed `address` arguments are left-padded with 12 zero bytes; any
    /// other padding means the topic does not hold an address.
    pub fn from_topic(topic: &str) -> Result<Self, AddressError> {
        let mut word = [0u8; 32];
        strip_hex_prefix(topic)
            .and_then(|h| hex::decode_to_slice(h, &mut word).ok())
            .ok_or_else(|| AddressError::InvalidTopic(topic.to_string()))?;
        let (padding, body) = word.split_at(12);
        if padding.iter().any(|b| *b != 0) {
            return Err(AddressError::DirtyPadding(topic.to_string()));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(body);
        Ok(Address(bytes))
    }

    /// Render the address as a left-padded 32-byte topic.
    pub fn to_topic(&self) -> String {
        format!("0x{}{}", "0".repeat(24), hex::encode(self.0))
    }
}

pub(crate) fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 20];
        strip_hex_prefix(s)
            .and_then(|h| hex::decode_to_slice(h, &mut bytes).ok())
            .ok_or_else(|| AddressError::InvalidFormat(s.to_string()))?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
