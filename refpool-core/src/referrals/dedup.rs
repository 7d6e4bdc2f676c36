use refpool_sdk::objects::ReferralEvent;
use std::collections::HashSet;

/// Keep only the first event for every user (first-touch attribution).
///
/// Input must be in on-chain order. Kept events retain their relative order.
pub fn remove_duplicates(events: Vec<ReferralEvent>) -> Vec<ReferralEvent> {
    let mut seen = HashSet::with_capacity(events.len());
    events
        .into_iter()
        .filter(|event| seen.insert(event.user_address))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use refpool_sdk::objects::{Address, Protocol};

    fn event(user: u8, referrer: u8, timestamp: i64) -> ReferralEvent {
        ReferralEvent {
            user_address: Address::new([user; 20]),
            timestamp,
            referrer_id: Address::new([referrer; 20]),
            protocol: Protocol::Beefy,
        }
    }

    #[test]
    fn test_keeps_first_referrer_per_user() {
        let events = vec![event(1, 0xa1, 1), event(2, 0xa1, 2), event(1, 0xa2, 3)];
        assert_eq!(
            remove_duplicates(events),
            vec![event(1, 0xa1, 1), event(2, 0xa1, 2)]
        );
    }

    #[test]
    fn test_is_idempotent() {
        let events = vec![
            event(3, 0xa1, 1),
            event(1, 0xa2, 2),
            event(3, 0xa3, 3),
            event(2, 0xa1, 4),
            event(1, 0xa1, 5),
        ];
        let once = remove_duplicates(events);
        let twice = remove_duplicates(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, vec![event(3, 0xa1, 1), event(1, 0xa2, 2), event(2, 0xa1, 4)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(remove_duplicates(Vec::new()).is_empty());
    }
}
