//! Integer amounts in a token's smallest unit.
//!
//! Amounts and KPI values travel as base-10 strings so that nothing is lost
//! to floating point. They are parsed into `U256`, the width of the reward
//! pool contract's `uint256` arguments.

use primitive_types::U256;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount {0:?} is negative")]
    Negative(String),
    #[error("amount {0:?} is not a base-10 integer")]
    Invalid(String),
    #[error("amount {0:?} does not fit in 256 bits")]
    Overflow(String),
    #[error("amount {value} has more than {decimals} fractional digits")]
    FractionalUnits { value: Decimal, decimals: u32 },
}

/// Parse a non-negative base-10 integer string.
pub fn parse_amount(value: &str) -> Result<U256, AmountError> {
    if value.starts_with('-') {
        return Err(AmountError::Negative(value.to_string()));
    }
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::Invalid(value.to_string()));
    }
    U256::from_dec_str(value).map_err(|_| AmountError::Overflow(value.to_string()))
}

/// Convert a human-readable token amount (e.g. `15000` or `0.5`) into
/// smallest units for a token with `decimals` decimals.
///
/// The conversion is exact: a value with more fractional digits than the
/// token supports is rejected rather than rounded.
pub fn parse_units(value: Decimal, decimals: u32) -> Result<U256, AmountError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative(value.to_string()));
    }
    let normalized = value.normalize();
    let scale = normalized.scale();
    if scale > decimals {
        return Err(AmountError::FractionalUnits { value, decimals });
    }
    // 10^77 is the largest power of ten below 2^256.
    let exponent = (decimals - scale) as usize;
    if exponent > 77 {
        return Err(AmountError::Overflow(value.to_string()));
    }
    let mantissa = U256::from(normalized.mantissa().unsigned_abs());
    mantissa
        .checked_mul(U256::exp10(exponent))
        .ok_or_else(|| AmountError::Overflow(value.to_string()))
}

/// Serde adapter for `U256` amounts written as base-10 strings.
///
/// Deserialization also accepts plain JSON integers.
pub mod dec_str {
    use super::parse_amount;
    use primitive_types::U256;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = U256;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or base-10 integer string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
                parse_amount(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
                Ok(U256::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
                u64::try_from(v)
                    .map(U256::from)
                    .map_err(|_| E::custom(format!("amount {v} is negative")))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0").unwrap(), U256::zero());
        assert_eq!(parse_amount("1000").unwrap(), U256::from(1000u64));
        assert_eq!(
            parse_amount("15000000000000000000000").unwrap(),
            U256::from(15_000u64) * U256::exp10(18)
        );
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        assert!(matches!(parse_amount("-5"), Err(AmountError::Negative(_))));
        assert!(matches!(parse_amount(""), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_amount("1.5"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_amount("0x10"), Err(AmountError::Invalid(_))));
        let too_big = "1".repeat(80);
        assert!(matches!(parse_amount(&too_big), Err(AmountError::Overflow(_))));
    }

    #[test]
    fn test_parse_units() {
        let value = Decimal::from_str("15000").unwrap();
        assert_eq!(
            parse_units(value, 18).unwrap(),
            U256::from(15_000u64) * U256::exp10(18)
        );
        let value = Decimal::from_str("0.25").unwrap();
        assert_eq!(parse_units(value, 6).unwrap(), U256::from(250_000u64));
        let value = Decimal::from_str("1.50").unwrap();
        assert_eq!(parse_units(value, 1).unwrap(), U256::from(15u64));
    }

    #[test]
    fn test_parse_units_rejects_negative_and_dust() {
        let value = Decimal::from_str("-1").unwrap();
        assert!(matches!(parse_units(value, 18), Err(AmountError::Negative(_))));
        let value = Decimal::from_str("0.0000001").unwrap();
        assert!(matches!(
            parse_units(value, 6),
            Err(AmountError::FractionalUnits { .. })
        ));
    }
}
