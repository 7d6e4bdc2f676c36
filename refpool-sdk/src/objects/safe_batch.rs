//! Safe transaction-builder batch for `addRewards`.
//!
//! The document is imported into the Safe UI, which fills in the fields it
//! does not find here. `meta` must be present even though it is empty.

use super::address::Address;
use super::reward::RewardRow;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeTransactionBatch {
    pub meta: BatchMeta,
    pub transactions: Vec<SafeTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchMeta {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransaction {
    pub to: Address,
    pub value: String,
    pub data: Option<String>,
    pub contract_method: ContractMethod,
    pub contract_inputs_values: AddRewardsInputs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractMethod {
    pub inputs: Vec<MethodInput>,
    pub name: String,
    pub payable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInput {
    #[serde(rename = "internalType")]
    pub internal_type: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl MethodInput {
    fn new(name: &str, kind: &str) -> Self {
        Self {
            internal_type: kind.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRewardsInputs {
    pub users: String,
    pub amounts: String,
    pub reward_function_args: String,
}

impl SafeTransactionBatch {
    /// Build an `addRewards` call on `reward_pool` for every row with a
    /// non-zero amount.
    pub fn add_rewards(
        reward_pool: Address,
        rewards: &[RewardRow],
        start: OffsetDateTime,
        end_exclusive: OffsetDateTime,
    ) -> Self {
        let (users, amounts): (Vec<String>, Vec<String>) = rewards
            .iter()
            .filter(|r| !r.reward_amount.is_zero())
            .map(|r| (r.referrer_id.to_string(), r.reward_amount.to_string()))
            .unzip();

        let transaction = SafeTransaction {
            to: reward_pool,
            value: "0".to_string(),
            data: None,
            contract_method: ContractMethod {
                inputs: vec![
                    MethodInput::new("users", "address[]"),
                    MethodInput::new("amounts", "uint256[]"),
                    MethodInput::new("rewardFunctionArgs", "uint256[]"),
                ],
                name: "addRewards".to_string(),
                payable: false,
            },
            contract_inputs_values: AddRewardsInputs {
                users: format!("[{}]", users.join(", ")),
                amounts: format!("[{}]", amounts.join(", ")),
                reward_function_args: format!(
                    "[{}, {}]",
                    start.unix_timestamp(),
                    end_exclusive.unix_timestamp()
                ),
            },
        };

        Self {
            meta: BatchMeta::default(),
            transactions: vec![transaction],
        }
    }
}
