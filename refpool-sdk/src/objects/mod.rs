pub mod address;
pub mod amount;
pub mod blockchains;
pub mod kpi;
pub mod logs;
pub mod referral;
pub mod reward;
pub mod safe_batch;

pub use address::{Address, AddressError};
pub use amount::{AmountError, parse_amount, parse_units};
pub use blockchains::{NetworkId, Protocol, UnknownIdentifier};
pub use kpi::KpiRow;
pub use logs::{LogPage, LogQuery, RawLog};
pub use referral::ReferralEvent;
pub use reward::{ExclusionEntry, ExclusionList, RewardRow};
pub use safe_batch::SafeTransactionBatch;
