use super::metrics::ReferrerMetrics;
use primitive_types::U256;
use refpool_sdk::objects::{ExclusionEntry, ExclusionList};
use tracing::{info, warn};

/// Receives a notice for every excluded referrer that had KPI to allocate.
///
/// Allocators return their rows; exclusions are reported on this side
/// channel so callers can collect or log them as they see fit.
pub trait ExclusionReporter: Send + Sync {
    fn referrer_excluded(&self, entry: &ExclusionEntry, kpi: U256);
}

/// Reports exclusions as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExclusionReporter;

impl ExclusionReporter for TracingExclusionReporter {
    fn referrer_excluded(&self, entry: &ExclusionEntry, kpi: U256) {
        if entry.should_warn {
            warn!(referrer = %entry.referrer_id, %kpi, "Excluded referrer had referrals");
        } else {
            info!(referrer = %entry.referrer_id, %kpi, "Referrer excluded from rewards");
        }
    }
}

/// Notify `reporter` once per excluded referrer present in `metrics`, in
/// address order.
pub(crate) fn report_exclusions(
    metrics: &ReferrerMetrics,
    excluded: &ExclusionList,
    reporter: &dyn ExclusionReporter,
) {
    for entry in excluded.entries() {
        if let Some(kpi) = metrics.referrer_kpis.get(&entry.referrer_id) {
            reporter.referrer_excluded(entry, *kpi);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use refpool_sdk::objects::Address;
    use std::sync::Mutex;

    /// Collects every notice for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingReporter {
        pub(crate) seen: Mutex<Vec<(Address, bool, U256)>>,
    }

    impl ExclusionReporter for RecordingReporter {
        fn referrer_excluded(&self, entry: &ExclusionEntry, kpi: U256) {
            self.seen
                .lock()
                .unwrap()
                .push((entry.referrer_id, entry.should_warn, kpi));
        }
    }

    #[test]
    fn test_only_present_referrers_are_reported() {
        let present = Address::new([1; 20]);
        let absent = Address::new([2; 20]);
        let mut metrics = ReferrerMetrics::default();
        metrics.referrer_kpis.insert(present, U256::from(9u64));

        let excluded: ExclusionList = [
            ExclusionEntry {
                referrer_id: absent,
                should_warn: true,
            },
            ExclusionEntry {
                referrer_id: present,
                should_warn: true,
            },
        ]
        .into_iter()
        .collect();

        let reporter = RecordingReporter::default();
        report_exclusions(&metrics, &excluded, &reporter);
        assert_eq!(
            *reporter.seen.lock().unwrap(),
            vec![(present, true, U256::from(9u64))]
        );
    }
}
