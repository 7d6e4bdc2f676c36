use super::address::Address;
use super::amount::dec_str;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Reward allocated to one referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRow {
    pub referrer_id: Address,
    #[serde(with = "dec_str")]
    pub kpi: U256,
    pub referral_count: u64,
    /// In the reward token's smallest unit.
    #[serde(with = "dec_str")]
    pub reward_amount: U256,
}

/// A referrer barred from campaign rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionEntry {
    pub referrer_id: Address,
    /// Only changes how loudly the exclusion is reported.
    #[serde(default)]
    pub should_warn: bool,
}

/// Excluded referrers keyed by address.
///
/// Serialized as a plain list of entries. Deserialization also accepts a
/// map from lowercase address to entry, whose keys must match the entries'
/// `referrerId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    entries: HashMap<Address, ExclusionEntry>,
}

impl ExclusionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, referrer: &Address) -> Option<&ExclusionEntry> {
        self.entries.get(referrer)
    }

    pub fn contains(&self, referrer: &Address) -> bool {
        self.entries.contains_key(referrer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, entry: ExclusionEntry) {
        self.entries.insert(entry.referrer_id, entry);
    }

    /// Entries sorted by address.
    pub fn entries(&self) -> Vec<&ExclusionEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|e| e.referrer_id);
        entries
    }
}

impl FromIterator<ExclusionEntry> for ExclusionList {
    fn from_iter<I: IntoIterator<Item = ExclusionEntry>>(iter: I) -> Self {
        let mut list = Self::new();
        for entry in iter {
            list.insert(entry);
        }
        list
    }
}

impl Serialize for ExclusionList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExclusionSource {
    List(Vec<ExclusionEntry>),
    Map(BTreeMap<Address, ExclusionEntry>),
}

impl<'de> Deserialize<'de> for ExclusionList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ExclusionSource::deserialize(deserializer)? {
            ExclusionSource::List(entries) => Ok(entries.into_iter().collect()),
            ExclusionSource::Map(entries) => {
                if let Some((key, entry)) = entries.iter().find(|(k, e)| **k != e.referrer_id) {
                    return Err(serde::de::Error::custom(format!(
                        "exclusion key {key} does not match referrerId {}",
                        entry.referrer_id
                    )));
                }
                Ok(entries.into_values().collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_row_json_shape() {
        let row = RewardRow {
            referrer_id: "0x7890abcdef1234567890abcdef1234567890abcd".parse().unwrap(),
            kpi: U256::from(42u64),
            referral_count: 3,
            reward_amount: U256::exp10(20),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "referrerId": "0x7890abcdef1234567890abcdef1234567890abcd",
                "kpi": "42",
                "referralCount": 3,
                "rewardAmount": "100000000000000000000",
            })
        );
    }

    #[test]
    fn test_exclusion_list_lookup_ignores_case() {
        let json = r#"[
            {"referrerId": "0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD", "shouldWarn": true},
            {"referrerId": "0x1111111111111111111111111111111111111111"}
        ]"#;
        let list: ExclusionList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        let flagged: Address = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd".parse().unwrap();
        assert!(list.get(&flagged).unwrap().should_warn);
        let quiet: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
        assert!(!list.get(&quiet).unwrap().should_warn);
    }

    #[test]
    fn test_exclusion_list_accepts_map_form() {
        let json = r#"{
            "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd": {
                "referrerId": "0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD",
                "shouldWarn": true
            },
            "0x1111111111111111111111111111111111111111": {
                "referrerId": "0x1111111111111111111111111111111111111111",
                "shouldWarn": false
            }
        }"#;
        let list: ExclusionList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        let flagged: Address = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd".parse().unwrap();
        assert!(list.get(&flagged).unwrap().should_warn);

        // written back as the list form
        let reparsed: ExclusionList =
            serde_json::from_value(serde_json::to_value(&list).unwrap()).unwrap();
        assert_eq!(reparsed, list);
    }

    #[test]
    fn test_exclusion_map_key_must_match_entry() {
        let json = r#"{
            "0x1111111111111111111111111111111111111111": {
                "referrerId": "0x2222222222222222222222222222222222222222"
            }
        }"#;
        assert!(serde_json::from_str::<ExclusionList>(json).is_err());
    }
}
