use super::address::Address;
use serde::{Deserialize, Serialize};

/// A KPI value produced by a protocol calculator for one referred user.
///
/// `kpi` is kept as the decimal string the calculator wrote. It is parsed
/// during aggregation so that a malformed or negative value is reported
/// against the row that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRow {
    pub referrer_id: Address,
    pub user_address: Address,
    pub kpi: String,
}

impl KpiRow {
    pub fn new(referrer_id: Address, user_address: Address, kpi: impl Into<String>) -> Self {
        Self {
            referrer_id,
            user_address,
            kpi: kpi.into(),
        }
    }
}
