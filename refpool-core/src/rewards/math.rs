//! Exact integer helpers.
//!
//! Amounts and KPIs are `U256`; products are formed in `U512` so that
//! `a * b / c` never overflows before the division.

use super::RewardError;
use primitive_types::{U256, U512};

/// Fixed-point scale applied to square roots: √x is represented as
/// `floor(√x × 10^18)`.
pub const SQRT_SCALE_DIGITS: usize = 18;

/// `floor(a × b / denominator)`. The caller guarantees a non-zero
/// denominator.
pub fn mul_div_floor(a: U256, b: U512, denominator: U512) -> Result<U256, RewardError> {
    let product = U512::from(a)
        .checked_mul(b)
        .ok_or(RewardError::Overflow("multiplying reward share"))?;
    U256::try_from(product / denominator).map_err(|_| RewardError::Overflow("narrowing reward share"))
}

/// `floor(√kpi × 10^18)`, rounding toward zero.
pub fn sqrt_weight(kpi: U256) -> U512 {
    // kpi < 2^256 and 10^36 < 2^120, so the product fits in 512 bits.
    (U512::from(kpi) * U512::exp10(2 * SQRT_SCALE_DIGITS)).integer_sqrt()
}

pub fn checked_sum<'a>(
    values: impl IntoIterator<Item = &'a U512>,
    context: &'static str,
) -> Result<U512, RewardError> {
    values
        .into_iter()
        .try_fold(U512::zero(), |acc, v| acc.checked_add(*v))
        .ok_or(RewardError::Overflow(context))
}
