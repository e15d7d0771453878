//! Property tests for the timeline reconciliation contract

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use assetflow::services::timeline::{reconcile, TimelineEntry};

const TITLES: &[&str] = &[
    "Created",
    "Assignment confirmed",
    "Returned",
    "Repair started",
    "Repair completed",
];

fn arb_entry() -> impl Strategy<Value = TimelineEntry> {
    (
        0..TITLES.len(),
        // A few days of seconds, plus subsecond noise
        0i64..260_000,
        0u32..1_000,
        any::<bool>(),
    )
        .prop_map(|(title, secs, millis, synthetic)| TimelineEntry {
            title: TITLES[title].to_string(),
            timestamp: Utc.timestamp_opt(1_700_000_000 + secs, millis * 1_000_000).unwrap(),
            description: String::new(),
            event_type: None,
            is_synthetic: synthetic,
        })
}

proptest! {
    /// Same inputs, same output, every call
    #[test]
    fn reconcile_is_deterministic(entries in prop::collection::vec(arb_entry(), 0..300)) {
        let a = reconcile(entries.clone(), 200);
        let b = reconcile(entries, 200);
        prop_assert_eq!(a, b);
    }

    /// Reconciling an already-reconciled timeline changes nothing
    #[test]
    fn reconcile_is_idempotent(entries in prop::collection::vec(arb_entry(), 0..300)) {
        let once = reconcile(entries, 200);
        let twice = reconcile(once.clone(), 200);
        prop_assert_eq!(once, twice);
    }

    /// Output is newest-first and never exceeds the cap
    #[test]
    fn reconcile_is_sorted_and_capped(
        entries in prop::collection::vec(arb_entry(), 0..300),
        cap in 1usize..250,
    ) {
        let merged = reconcile(entries, cap);
        prop_assert!(merged.len() <= cap);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    /// No two entries share `(title, second)` after the merge
    #[test]
    fn reconcile_deduplicates(entries in prop::collection::vec(arb_entry(), 0..300)) {
        let merged = reconcile(entries, usize::MAX);
        let mut seen = std::collections::HashSet::new();
        for entry in &merged {
            prop_assert!(seen.insert((entry.title.clone(), entry.timestamp.timestamp())));
        }
    }
}
