//! History event model: the append-only audit record

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{EventType, Role, TargetType};
use super::Actor;

/// Free-form key/value snapshot attached to an event
/// (e.g. `from_status` / `to_status`). A BTreeMap keeps serialization
/// order deterministic.
pub type EventMetadata = BTreeMap<String, String>;

/// One entry of the audit trail.
///
/// Created exactly once by the mutating operation itself, never edited or
/// deleted. Ordering is by timestamp, ties broken by insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub id: String,
    /// Creation time, immutable
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub actor_name: Option<String>,
    #[serde(default)]
    pub actor_role: Option<Role>,
    pub target_type: TargetType,
    pub target_id: String,
    pub target_name: String,
    pub description: String,
    #[serde(default)]
    pub metadata: EventMetadata,
    /// Machine-generated, no human actor
    #[serde(default)]
    pub is_system: bool,
    /// Hidden from non-privileged viewers
    #[serde(default)]
    pub is_sensitive: bool,
}

impl HistoryEvent {
    /// New event attributed to a human actor
    pub fn new(
        actor: &Actor,
        event_type: EventType,
        target_type: TargetType,
        target_id: impl Into<String>,
        target_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            actor_id: Some(actor.id.clone()),
            actor_name: Some(actor.name.clone()),
            actor_role: Some(actor.role),
            target_type,
            target_id: target_id.into(),
            target_name: target_name.into(),
            description: description.into(),
            metadata: EventMetadata::new(),
            is_system: false,
            is_sensitive: false,
        }
    }

    /// New machine-generated event with no human actor
    pub fn system(
        event_type: EventType,
        target_type: TargetType,
        target_id: impl Into<String>,
        target_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            actor_id: None,
            actor_name: None,
            actor_role: None,
            target_type,
            target_id: target_id.into(),
            target_name: target_name.into(),
            description: description.into(),
            metadata: EventMetadata::new(),
            is_system: true,
            is_sensitive: false,
        }
    }

    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.is_sensitive = true;
        self
    }
}
