//! Reward allocation.
//!
//! KPI rows are aggregated per referrer ([`metrics`]) and a finite pool is
//! split among them by one of three allocators:
//!
//! - [`calculate_proportional_prize_contest`]: share ∝ KPI
//! - [`calculate_sqrt_proportional_prize_contest`]: share ∝ √KPI
//! - [`calculate_capped_prize_contest`]: share ∝ KPI with a per-referrer cap,
//!   the capped-off remainder flowing to lower-KPI referrers
//!
//! All allocators are pure and synchronous. Amounts are integers in the
//! reward token's smallest unit; every division rounds toward zero, so the
//! distributed total never exceeds the pool.

pub mod capped;
pub mod math;
pub mod metrics;
pub mod proportional;
pub mod reporter;
pub mod strategy;

pub use capped::calculate_capped_prize_contest;
pub use metrics::{
    ReferrerMetrics, UserMetrics, get_referrer_metrics_from_kpi, get_user_metrics_from_kpi,
};
pub use proportional::{calculate_proportional_prize_contest, calculate_sqrt_proportional_prize_contest};
pub use reporter::{ExclusionReporter, TracingExclusionReporter};
pub use strategy::{RewardStrategy, RewardSummary, allocate, cap_from_proportion};

use refpool_sdk::objects::{Address, AmountError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that abort an aggregation or allocation.
#[derive(Debug, Error)]
pub enum RewardError {
    #[error("invalid KPI for referrer {referrer_id}, user {user_address}: {source}")]
    InvalidKpi {
        referrer_id: Address,
        user_address: Address,
        #[source]
        source: AmountError,
    },

    #[error("invalid reward amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("cap proportion {0} must be between 0 and 1")]
    InvalidCapProportion(Decimal),

    #[error("arithmetic overflow while {0}")]
    Overflow(&'static str),
}
