//! Capped ("water-filling") allocation.
//!
//! Referrers are visited from the highest KPI down. Each takes its
//! proportional share of what is still left in the pool, limited to the cap.
//! Whatever a capped referrer leaves behind stays in the pool and is shared
//! by the referrers after it.

use super::RewardError;
use super::math::mul_div_floor;
use super::metrics::ReferrerMetrics;
use super::reporter::{ExclusionReporter, report_exclusions};
use itertools::Itertools;
use primitive_types::{U256, U512};
use refpool_sdk::objects::{ExclusionList, RewardRow};

/// Rows are returned in processing order: descending KPI, ties by ascending
/// address.
pub fn calculate_capped_prize_contest(
    metrics: &ReferrerMetrics,
    rewards: U256,
    reward_cap: U256,
    excluded: &ExclusionList,
    reporter: &dyn ExclusionReporter,
) -> Result<Vec<RewardRow>, RewardError> {
    report_exclusions(metrics, excluded, reporter);

    let mut kpi_sum_remaining = metrics
        .referrer_kpis
        .iter()
        .filter(|(referrer, _)| !excluded.contains(referrer))
        .try_fold(U256::zero(), |acc, (_, kpi)| acc.checked_add(*kpi))
        .ok_or(RewardError::Overflow("summing eligible KPI"))?;
    let mut rewards_remaining = rewards;

    // BTreeMap iteration is already address-ordered; the stable sort keeps
    // that order among equal KPIs.
    let ordered = metrics
        .referrer_kpis
        .iter()
        .sorted_by(|(_, a), (_, b)| b.cmp(a));

    let mut rows = Vec::with_capacity(metrics.referrer_kpis.len());
    for (referrer_id, kpi) in ordered {
        let is_excluded = excluded.contains(referrer_id);
        let reward_amount = if is_excluded || kpi_sum_remaining.is_zero() {
            U256::zero()
        } else {
            mul_div_floor(
                rewards_remaining,
                U512::from(*kpi),
                U512::from(kpi_sum_remaining),
            )?
            .min(reward_cap)
        };

        // Shares are floored fractions of what remains, so neither
        // subtraction can underflow.
        rewards_remaining = rewards_remaining.saturating_sub(reward_amount);
        if !is_excluded {
            kpi_sum_remaining = kpi_sum_remaining.saturating_sub(*kpi);
        }

        rows.push(RewardRow {
            referrer_id: *referrer_id,
            kpi: *kpi,
            referral_count: metrics.referral_count(referrer_id),
            reward_amount,
        });
    }

    Ok(rows)
}
