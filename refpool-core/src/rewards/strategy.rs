use super::RewardError;
use super::capped::calculate_capped_prize_contest;
use super::math::mul_div_floor;
use super::metrics::ReferrerMetrics;
use super::proportional::{
    calculate_proportional_prize_contest, calculate_sqrt_proportional_prize_contest,
};
use super::reporter::ExclusionReporter;
use primitive_types::{U256, U512};
use refpool_sdk::objects::{ExclusionList, RewardRow};
use rust_decimal::Decimal;
use tracing::info;

/// How a campaign's pool is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardStrategy {
    Linear,
    Sqrt,
    /// Linear with at most `cap` per referrer.
    Capped { cap: U256 },
}

impl RewardStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            RewardStrategy::Linear => "linear",
            RewardStrategy::Sqrt => "sqrt",
            RewardStrategy::Capped { .. } => "capped",
        }
    }
}

/// Totals of one allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSummary {
    pub pool: U256,
    pub distributed: U256,
    pub undistributed: U256,
    /// Rows with a non-zero reward.
    pub recipients: usize,
}

impl RewardSummary {
    pub fn from_rows(pool: U256, rows: &[RewardRow]) -> Self {
        let distributed = rows
            .iter()
            .fold(U256::zero(), |acc, row| acc.saturating_add(row.reward_amount));
        Self {
            pool,
            distributed,
            undistributed: pool.saturating_sub(distributed),
            recipients: rows.iter().filter(|r| !r.reward_amount.is_zero()).count(),
        }
    }
}

/// Run the allocator selected by `strategy` and log the outcome.
pub fn allocate(
    strategy: RewardStrategy,
    metrics: &ReferrerMetrics,
    rewards: U256,
    excluded: &ExclusionList,
    reporter: &dyn ExclusionReporter,
) -> Result<Vec<RewardRow>, RewardError> {
    let rows = match strategy {
        RewardStrategy::Linear => {
            calculate_proportional_prize_contest(metrics, rewards, excluded, reporter)?
        }
        RewardStrategy::Sqrt => {
            calculate_sqrt_proportional_prize_contest(metrics, rewards, excluded, reporter)?
        }
        RewardStrategy::Capped { cap } => {
            calculate_capped_prize_contest(metrics, rewards, cap, excluded, reporter)?
        }
    };

    let summary = RewardSummary::from_rows(rewards, &rows);
    info!(
        strategy = strategy.name(),
        referrers = rows.len(),
        recipients = summary.recipients,
        pool = %summary.pool,
        distributed = %summary.distributed,
        undistributed = %summary.undistributed,
        "Allocated reward pool"
    );

    Ok(rows)
}

/// `floor(pool × proportion)` for a proportion between 0 and 1.
pub fn cap_from_proportion(pool: U256, proportion: Decimal) -> Result<U256, RewardError> {
    if proportion < Decimal::ZERO || proportion > Decimal::ONE {
        return Err(RewardError::InvalidCapProportion(proportion));
    }
    let mantissa = u128::try_from(proportion.mantissa())
        .map_err(|_| RewardError::InvalidCapProportion(proportion))?;
    mul_div_floor(
        pool,
        U512::from(mantissa),
        U512::exp10(proportion.scale() as usize),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::reporter::tests::RecordingReporter;
    use refpool_sdk::objects::Address;
    use std::str::FromStr;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn metrics() -> ReferrerMetrics {
        let mut metrics = ReferrerMetrics::default();
        for (referrer, kpi) in [(1u8, 100u64), (2, 50), (3, 50)] {
            metrics.referrer_kpis.insert(addr(referrer), U256::from(kpi));
            metrics.referrer_referrals.insert(addr(referrer), 2);
            metrics.total_kpi += U256::from(kpi);
        }
        metrics
    }

    #[test]
    fn test_allocate_dispatches() {
        let reporter = RecordingReporter::default();
        let pool = U256::from(1000u64);
        let none = ExclusionList::new();

        let linear = allocate(RewardStrategy::Linear, &metrics(), pool, &none, &reporter).unwrap();
        let capped = allocate(
            RewardStrategy::Capped {
                cap: U256::from(400u64),
            },
            &metrics(),
            pool,
            &none,
            &reporter,
        )
        .unwrap();

        let linear: Vec<u64> = linear.iter().map(|r| r.reward_amount.as_u64()).collect();
        let capped: Vec<u64> = capped.iter().map(|r| r.reward_amount.as_u64()).collect();
        assert_eq!(linear, vec![500, 250, 250]);
        assert_eq!(capped, vec![400, 300, 300]);
    }

    #[test]
    fn test_summary() {
        let rows = allocate(
            RewardStrategy::Capped {
                cap: U256::from(100u64),
            },
            &metrics(),
            U256::from(1000u64),
            &ExclusionList::new(),
            &RecordingReporter::default(),
        )
        .unwrap();
        let summary = RewardSummary::from_rows(U256::from(1000u64), &rows);
        assert_eq!(summary.distributed, U256::from(300u64));
        assert_eq!(summary.undistributed, U256::from(700u64));
        assert_eq!(summary.recipients, 3);
    }

    #[test]
    fn test_cap_from_proportion() {
        let pool = U256::from(1000u64);
        let cap = |p: &str| cap_from_proportion(pool, Decimal::from_str(p).unwrap());

        assert_eq!(cap("0.2").unwrap(), U256::from(200u64));
        assert_eq!(cap("0.3333").unwrap(), U256::from(333u64));
        assert_eq!(cap("1").unwrap(), pool);
        assert_eq!(cap("0").unwrap(), U256::zero());
        assert!(matches!(cap("1.01"), Err(RewardError::InvalidCapProportion(_))));
        assert!(matches!(cap("-0.1"), Err(RewardError::InvalidCapProportion(_))));
    }
}
