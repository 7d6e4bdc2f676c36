//! KPI aggregation.
//!
//! Rows are summed per referrer and per user. Nothing is filtered here;
//! exclusions are applied by the allocators so totals stay auditable.

use super::RewardError;
use primitive_types::U256;
use refpool_sdk::objects::{Address, KpiRow, parse_amount};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Per-referrer KPI sums and referral counts.
///
/// Maps are ordered by address, which fixes the row order of the
/// proportional allocators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferrerMetrics {
    pub referrer_kpis: BTreeMap<Address, U256>,
    pub referrer_referrals: BTreeMap<Address, u64>,
    /// Sum of every referrer's KPI, excluded referrers included.
    pub total_kpi: U256,
}

impl ReferrerMetrics {
    pub fn referral_count(&self, referrer: &Address) -> u64 {
        self.referrer_referrals.get(referrer).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.referrer_kpis.is_empty()
    }
}

/// Per-user KPI sums, with the referrer each user was first seen under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMetrics {
    pub user_kpis: BTreeMap<Address, U256>,
    pub user_referrers: BTreeMap<Address, Address>,
}

fn parse_row_kpi(row: &KpiRow) -> Result<U256, RewardError> {
    parse_amount(&row.kpi).map_err(|source| RewardError::InvalidKpi {
        referrer_id: row.referrer_id,
        user_address: row.user_address,
        source,
    })
}

pub fn get_referrer_metrics_from_kpi(rows: &[KpiRow]) -> Result<ReferrerMetrics, RewardError> {
    let mut metrics = ReferrerMetrics::default();
    for row in rows {
        let kpi = parse_row_kpi(row)?;
        let sum = metrics.referrer_kpis.entry(row.referrer_id).or_default();
        *sum = sum
            .checked_add(kpi)
            .ok_or(RewardError::Overflow("summing referrer KPI"))?;
        *metrics.referrer_referrals.entry(row.referrer_id).or_default() += 1;
        metrics.total_kpi = metrics
            .total_kpi
            .checked_add(kpi)
            .ok_or(RewardError::Overflow("summing total KPI"))?;
    }
    Ok(metrics)
}

pub fn get_user_metrics_from_kpi(rows: &[KpiRow]) -> Result<UserMetrics, RewardError> {
    let mut metrics = UserMetrics::default();
    for row in rows {
        let kpi = parse_row_kpi(row)?;
        let sum = metrics.user_kpis.entry(row.user_address).or_default();
        *sum = sum
            .checked_add(kpi)
            .ok_or(RewardError::Overflow("summing user KPI"))?;
        if let Entry::Vacant(entry) = metrics.user_referrers.entry(row.user_address) {
            entry.insert(row.referrer_id);
        }
    }
    Ok(metrics)
}
