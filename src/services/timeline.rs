//! Timeline reconciliation
//!
//! The presentation timeline of an entity merges two sources: the
//! authoritative audit events recorded by the engine, and *synthetic*
//! entries derived from the entity's own timestamp fields: data seeded
//! before the audit log existed, or moves that were never explicitly
//! logged. The merge contract: stable sort by timestamp descending,
//! deduplicate on `(title, timestamp floored to the second)`, cap the
//! result. Same inputs, same output, every call.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{
    enums::EventType,
    Equipment, HistoryEvent,
};

/// One presentation entry of a reconciled timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub event_type: Option<EventType>,
    /// Derived from an entity timestamp field rather than the audit log
    pub is_synthetic: bool,
}

impl TimelineEntry {
    fn dedup_key(&self) -> (String, i64) {
        (self.title.clone(), self.timestamp.timestamp())
    }
}

/// Map an authoritative audit event to a timeline entry
pub fn from_event(event: &HistoryEvent) -> TimelineEntry {
    TimelineEntry {
        title: event.event_type.label().to_string(),
        timestamp: event.timestamp,
        description: event.description.clone(),
        event_type: Some(event.event_type),
        is_synthetic: false,
    }
}

/// Synthesize entries from an equipment record's own timestamp fields
pub fn synthetic_entries(equipment: &Equipment) -> Vec<TimelineEntry> {
    let mut entries = Vec::new();
    let holder = equipment.user_name.as_deref().unwrap_or("unknown");

    let mut push = |ts: Option<DateTime<Utc>>, event_type: EventType, description: String| {
        if let Some(ts) = ts {
            entries.push(TimelineEntry {
                title: event_type.label().to_string(),
                timestamp: ts,
                description,
                event_type: Some(event_type),
                is_synthetic: true,
            });
        }
    };

    push(
        Some(equipment.created_at),
        EventType::Create,
        format!("{} entered the inventory", equipment.asset_id),
    );
    push(
        equipment.assigned_at,
        EventType::AssignPending,
        format!(
            "Assigned to {holder}{}",
            equipment
                .assigned_by_name
                .as_deref()
                .map(|by| format!(" by {by}"))
                .unwrap_or_default()
        ),
    );
    push(
        equipment.confirmed_at,
        EventType::AssignConfirmed,
        format!("Receipt confirmed by {holder}"),
    );
    push(
        equipment.return_requested_at,
        EventType::Return,
        format!("Return requested by {holder}"),
    );
    push(
        equipment.return_inspected_at,
        EventType::Return,
        "Return inspected".to_string(),
    );
    push(
        equipment.repair_start_date,
        EventType::RepairStart,
        format!("{} sent to repair", equipment.asset_id),
    );
    push(
        equipment.repair_end_date,
        EventType::RepairEnd,
        format!("{} back from repair", equipment.asset_id),
    );

    entries
}

/// Merge authoritative and synthetic entries into one deduplicated
/// timeline, newest first, at most `cap` entries.
pub fn reconcile(mut entries: Vec<TimelineEntry>, cap: usize) -> Vec<TimelineEntry> {
    // Stable: equal timestamps keep their input order
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut seen = HashSet::new();
    let mut merged: Vec<TimelineEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.dedup_key()))
        .collect();
    merged.truncate(cap);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(title: &str, ts: DateTime<Utc>) -> TimelineEntry {
        TimelineEntry {
            title: title.to_string(),
            timestamp: ts,
            description: String::new(),
            event_type: None,
            is_synthetic: false,
        }
    }

    #[test]
    fn newest_first_and_deduplicated() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();
        // Same title, same second, different subsecond: one survives
        let t1_dup = t1 + chrono::Duration::milliseconds(400);

        let merged = reconcile(
            vec![
                entry("Created", t0),
                entry("Returned", t1),
                entry("Returned", t1_dup),
            ],
            200,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "Returned");
        assert_eq!(merged[1].title, "Created");
    }

    #[test]
    fn same_second_different_title_kept() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let merged = reconcile(vec![entry("Created", t), entry("Returned", t)], 200);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn cap_is_enforced() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let entries: Vec<_> = (0..500)
            .map(|i| entry("Updated", base + chrono::Duration::seconds(i)))
            .collect();
        let merged = reconcile(entries, 200);
        assert_eq!(merged.len(), 200);
        // Newest survived the truncation
        assert_eq!(
            merged[0].timestamp,
            base + chrono::Duration::seconds(499)
        );
    }

    #[test]
    fn reconcile_is_idempotent() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let input = vec![
            entry("Created", t0),
            entry("Assignment confirmed", t0 + chrono::Duration::hours(1)),
            entry("Created", t0),
        ];
        let once = reconcile(input.clone(), 200);
        let twice = reconcile(once.clone(), 200);
        assert_eq!(once, twice);
    }
}
