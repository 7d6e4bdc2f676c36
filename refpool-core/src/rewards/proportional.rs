//! Proportional allocators.
//!
//! Both allocators give excluded referrers zero weight and a zero reward,
//! and floor every share. Rows come out in ascending referrer order.

use super::RewardError;
use super::math::{checked_sum, mul_div_floor, sqrt_weight};
use super::metrics::ReferrerMetrics;
use super::reporter::{ExclusionReporter, report_exclusions};
use primitive_types::{U256, U512};
use refpool_sdk::objects::{Address, ExclusionList, RewardRow};

/// Split `rewards` in proportion to each referrer's KPI.
pub fn calculate_proportional_prize_contest(
    metrics: &ReferrerMetrics,
    rewards: U256,
    excluded: &ExclusionList,
    reporter: &dyn ExclusionReporter,
) -> Result<Vec<RewardRow>, RewardError> {
    split_by_weight(metrics, rewards, excluded, reporter, |kpi| U512::from(kpi))
}

/// Split `rewards` in proportion to the square root of each referrer's KPI.
///
/// Weights are `floor(√kpi × 10^18)`.
pub fn calculate_sqrt_proportional_prize_contest(
    metrics: &ReferrerMetrics,
    rewards: U256,
    excluded: &ExclusionList,
    reporter: &dyn ExclusionReporter,
) -> Result<Vec<RewardRow>, RewardError> {
    split_by_weight(metrics, rewards, excluded, reporter, sqrt_weight)
}

fn split_by_weight(
    metrics: &ReferrerMetrics,
    rewards: U256,
    excluded: &ExclusionList,
    reporter: &dyn ExclusionReporter,
    weight: impl Fn(U256) -> U512,
) -> Result<Vec<RewardRow>, RewardError> {
    report_exclusions(metrics, excluded, reporter);

    let weights: Vec<(Address, U256, U512)> = metrics
        .referrer_kpis
        .iter()
        .map(|(referrer, kpi)| {
            let w = if excluded.contains(referrer) {
                U512::zero()
            } else {
                weight(*kpi)
            };
            (*referrer, *kpi, w)
        })
        .collect();
    let total = checked_sum(weights.iter().map(|(_, _, w)| w), "summing allocation weights")?;

    weights
        .into_iter()
        .map(|(referrer_id, kpi, w)| {
            let reward_amount = if total.is_zero() || w.is_zero() {
                U256::zero()
            } else {
                mul_div_floor(rewards, w, total)?
            };
            Ok(RewardRow {
                referrer_id,
                kpi,
                referral_count: metrics.referral_count(&referrer_id),
                reward_amount,
            })
        })
        .collect()
}
