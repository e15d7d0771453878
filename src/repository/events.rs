//! Audit log methods on Repository

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::TargetType,
        HistoryEvent,
    },
    services::timeline::{self, TimelineEntry},
};

impl Repository {
    /// Append an event directly to the audit trail.
    ///
    /// The sole write path for events outside the state machines (system
    /// notifications such as manager headcount notices). Always succeeds
    /// from the caller's point of view.
    pub fn log_event(&mut self, event: HistoryEvent) {
        self.record_event(event);
    }

    /// The full audit trail, in insertion order
    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    /// Authoritative events for one entity, in insertion order
    pub fn events_for_target(&self, target_type: TargetType, target_id: &str) -> Vec<&HistoryEvent> {
        self.events
            .iter()
            .filter(|ev| ev.target_type == target_type && ev.target_id == target_id)
            .collect()
    }

    /// Reconciled movement timeline of one equipment item: authoritative
    /// events merged with entries synthesized from the record's own
    /// timestamp fields, newest first, deduplicated, capped.
    pub fn equipment_timeline(&self, id: &str) -> AppResult<Vec<TimelineEntry>> {
        let item = self
            .equipment
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;

        let mut entries: Vec<TimelineEntry> = self
            .events_for_target(TargetType::Equipment, id)
            .into_iter()
            .map(timeline::from_event)
            .collect();
        entries.extend(timeline::synthetic_entries(item));

        Ok(timeline::reconcile(entries, self.settings.timeline_limit))
    }
}
