//! Domain repository: the mutation surface of the engine
//!
//! The repository exclusively owns the four collections. Guards and state
//! machines are consulted as pure functions; this layer commits what they
//! compute, appends the matching audit events and snapshots the touched
//! collections to the store. Every mutating method takes `&mut self`, so
//! one logical operation always runs to completion before the next one
//! observes state.

pub mod approvals;
pub mod equipment;
pub mod events;
pub mod users;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    models::{
        enums::{ApprovalStatus, AssignmentStatus, EquipmentStatus, EventType, Role, TargetType},
        Actor, Approval, Decision, Equipment, HistoryEvent, Settings, User,
    },
    seed,
    storage::{self, SnapshotStore},
};

/// Main repository owning the in-memory collections
pub struct Repository {
    pub(crate) users: IndexMap<String, User>,
    pub(crate) equipment: IndexMap<String, Equipment>,
    pub(crate) approvals: IndexMap<String, Approval>,
    pub(crate) events: Vec<HistoryEvent>,
    pub(crate) settings: Settings,
    store: Option<SnapshotStore>,
}

/// Collection counts for dashboards and the integrity report
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub users: usize,
    pub equipment: usize,
    pub available: usize,
    pub assigned: usize,
    pub under_repair: usize,
    pub approvals: usize,
    pub pending_approvals: usize,
    pub events: usize,
}

impl Repository {
    /// Empty repository with no persistence (tests, dry runs)
    pub fn new() -> Self {
        Self {
            users: IndexMap::new(),
            equipment: IndexMap::new(),
            approvals: IndexMap::new(),
            events: Vec::new(),
            settings: Settings::default(),
            store: None,
        }
    }

    /// Repository pre-populated with the seed dataset, no persistence
    pub fn seeded() -> Self {
        let mut repo = Self::new();
        repo.users = seed::users().into_iter().map(|u| (u.id.clone(), u)).collect();
        repo.equipment = seed::equipment()
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();
        repo.settings = seed::settings();
        repo
    }

    /// Load state from the snapshot store, merging the seed dataset in.
    ///
    /// Missing or corrupt collections fall back to the seed; persisted
    /// records always win over seeded ones with the same id.
    pub fn load(store: SnapshotStore, seed_on_start: bool) -> Self {
        let persisted_users: Vec<User> = store.load(storage::USERS_KEY).unwrap_or_default();
        let persisted_equipment: Vec<Equipment> =
            store.load(storage::EQUIPMENT_KEY).unwrap_or_default();
        let persisted_approvals: Vec<Approval> =
            store.load(storage::APPROVALS_KEY).unwrap_or_default();
        let events: Vec<HistoryEvent> = store.load(storage::EVENTS_KEY).unwrap_or_default();
        let settings: Settings = store
            .load(storage::SETTINGS_KEY)
            .unwrap_or_else(seed::settings);

        let (users, equipment) = if seed_on_start {
            (
                seed::merge_by_id(persisted_users, seed::users(), |u| u.id.as_str()),
                seed::merge_by_id(persisted_equipment, seed::equipment(), |e| e.id.as_str()),
            )
        } else {
            (persisted_users, persisted_equipment)
        };

        let repo = Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            equipment: equipment.into_iter().map(|e| (e.id.clone(), e)).collect(),
            approvals: persisted_approvals
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            events,
            settings,
            store: Some(store),
        };
        tracing::info!(
            users = repo.users.len(),
            equipment = repo.equipment.len(),
            approvals = repo.approvals.len(),
            events = repo.events.len(),
            "repository loaded"
        );
        repo
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings record and snapshot it
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.persist(storage::SETTINGS_KEY, &self.settings);
    }

    pub fn summary(&self) -> Summary {
        Summary {
            users: self.users.len(),
            equipment: self.equipment.len(),
            available: self
                .equipment
                .values()
                .filter(|e| e.status == EquipmentStatus::Available)
                .count(),
            assigned: self
                .equipment
                .values()
                .filter(|e| e.status == EquipmentStatus::Assigned)
                .count(),
            under_repair: self
                .equipment
                .values()
                .filter(|e| e.status == EquipmentStatus::UnderRepair)
                .count(),
            approvals: self.approvals.len(),
            pending_approvals: self.approvals.values().filter(|a| a.is_active()).count(),
            events: self.events.len(),
        }
    }

    /// Check the cross-entity invariants over live data and return one
    /// message per violation (empty = healthy).
    pub fn integrity_report(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if !self
            .users
            .values()
            .any(|u| u.role == Role::SuperAdmin && u.is_active())
        {
            violations.push("no active SuperAdmin in the directory".to_string());
        }

        for item in self.equipment.values() {
            if !item.custody_coherent() {
                violations.push(format!(
                    "{}: holder/assignment mismatch ({} with holder {:?})",
                    item.asset_id, item.assignment_status, item.user
                ));
            }
        }

        for approval in self.approvals.values() {
            let Some(eq_id) = approval.assigned_equipment_id.as_deref() else {
                continue;
            };
            let Some(item) = self.equipment.get(eq_id) else {
                if approval.is_active() {
                    violations.push(format!(
                        "approval {}: reserved equipment {} is missing",
                        approval.id, eq_id
                    ));
                }
                continue;
            };
            if approval.is_active() {
                let expected = match approval.status {
                    ApprovalStatus::WaitingManagerApproval => {
                        AssignmentStatus::WaitingManagerApproval
                    }
                    ApprovalStatus::WaitingItProcessing => AssignmentStatus::WaitingItProcessing,
                    _ => continue,
                };
                if item.assignment_status != expected {
                    violations.push(format!(
                        "approval {}: {} is {} but the request is {}",
                        approval.id, item.asset_id, item.assignment_status, approval.status
                    ));
                }
                if item.user.as_deref() != Some(approval.beneficiary_id.as_str()) {
                    violations.push(format!(
                        "approval {}: {} is not held by beneficiary {}",
                        approval.id, item.asset_id, approval.beneficiary_name
                    ));
                }
            }
        }

        violations
    }

    // ----- internal commit plumbing -------------------------------------

    /// Fire-and-forget snapshot write; storage trouble is logged, never
    /// surfaced to the caller (the in-memory commit already happened).
    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(key, value) {
                tracing::warn!("snapshot write failed for key {key}: {e}");
            }
        }
    }

    pub(crate) fn persist_users(&self) {
        let all: Vec<&User> = self.users.values().collect();
        self.persist(storage::USERS_KEY, &all);
    }

    pub(crate) fn persist_equipment(&self) {
        let all: Vec<&Equipment> = self.equipment.values().collect();
        self.persist(storage::EQUIPMENT_KEY, &all);
    }

    pub(crate) fn persist_approvals(&self) {
        let all: Vec<&Approval> = self.approvals.values().collect();
        self.persist(storage::APPROVALS_KEY, &all);
    }

    pub(crate) fn persist_events(&self) {
        self.persist(storage::EVENTS_KEY, &self.events);
    }

    /// Append one event to the audit trail and snapshot it
    pub(crate) fn record_event(&mut self, event: HistoryEvent) {
        self.events.push(event);
        self.persist_events();
    }

    /// Record a guard denial as a sensitive audit event and hand the
    /// decision back, so repeated unauthorized attempts stay discoverable.
    pub(crate) fn log_denial(
        &mut self,
        actor: &Actor,
        target_type: TargetType,
        target_id: &str,
        target_name: &str,
        decision: Decision,
    ) -> Decision {
        let reason = decision
            .reason
            .clone()
            .unwrap_or_else(|| "operation denied".to_string());
        tracing::warn!(
            actor = %actor.name,
            target = target_name,
            "denied: {reason}"
        );
        let event = HistoryEvent::new(
            actor,
            EventType::AccessDenied,
            target_type,
            target_id,
            target_name,
            reason,
        )
        .sensitive();
        self.record_event(event);
        decision
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
