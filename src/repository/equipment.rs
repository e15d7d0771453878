//! Equipment domain methods on Repository

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{AssignmentStatus, EquipmentStatus, EventType, TargetType},
        Actor, CreateEquipment, Decision, Equipment, EventMetadata, HistoryEvent, UpdateEquipment,
    },
    services::{authorization, lifecycle},
};

impl Repository {
    /// List all equipment in insertion order
    pub fn equipment_list(&self) -> Vec<&Equipment> {
        self.equipment.values().collect()
    }

    /// Get an equipment item by id
    pub fn equipment(&self, id: &str) -> Option<&Equipment> {
        self.equipment.get(id)
    }

    /// Get an equipment item by display code
    pub fn equipment_by_asset_id(&self, asset_id: &str) -> Option<&Equipment> {
        self.equipment.values().find(|e| e.asset_id == asset_id)
    }

    /// Add an equipment item to the inventory
    pub fn add_equipment(&mut self, actor: &Actor, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        if self
            .equipment
            .values()
            .any(|e| e.asset_id == data.asset_id)
        {
            return Err(AppError::Conflict(format!(
                "Asset id {} is already in the inventory",
                data.asset_id
            )));
        }

        let now = Utc::now();
        let item = Equipment {
            id: data
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            asset_id: data.asset_id,
            equipment_type: data.equipment_type,
            model: data.model,
            status: EquipmentStatus::Available,
            assignment_status: AssignmentStatus::None,
            user: None,
            user_name: None,
            assigned_at: None,
            assigned_by_name: None,
            confirmed_at: None,
            return_requested_at: None,
            return_inspected_at: None,
            repair_start_date: None,
            repair_end_date: None,
            financial: data.financial,
            created_at: now,
            updated_at: now,
        };

        let event = HistoryEvent::new(
            actor,
            EventType::Create,
            TargetType::Equipment,
            item.id.as_str(),
            item.asset_id.as_str(),
            format!("{} ({}) entered the inventory", item.asset_id, item.model),
        );
        self.equipment.insert(item.id.clone(), item.clone());
        self.persist_equipment();
        self.record_event(event);
        Ok(item)
    }

    /// Apply a patch to an equipment item.
    ///
    /// The lifecycle machine classifies the diff into exactly one semantic
    /// event; `extra_metadata` is merged into that event's metadata.
    pub fn update_equipment(
        &mut self,
        actor: &Actor,
        id: &str,
        patch: UpdateEquipment,
        extra_metadata: Option<EventMetadata>,
    ) -> AppResult<Equipment> {
        let old = self
            .equipment
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;

        let new = patch.apply(&old, Utc::now());
        let change = lifecycle::classify(&old, &new);

        let mut metadata = change.metadata;
        if let Some(extra) = extra_metadata {
            metadata.extend(extra);
        }
        let event = HistoryEvent::new(
            actor,
            change.event_type,
            TargetType::Equipment,
            id,
            new.asset_id.as_str(),
            change.description,
        )
        .with_metadata(metadata);

        self.equipment.insert(id.to_string(), new.clone());
        self.persist_equipment();
        self.record_event(event);
        Ok(new)
    }

    /// Delete an equipment item
    pub fn delete_equipment(&mut self, actor: &Actor, id: &str) -> AppResult<Decision> {
        let target = self
            .equipment
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;

        let events: Vec<&HistoryEvent> = self.events.iter().collect();
        let decision = authorization::can_delete_equipment(&target, &events);
        if !decision.allowed {
            return Ok(self.log_denial(
                actor,
                TargetType::Equipment,
                id,
                &target.asset_id,
                decision,
            ));
        }

        let event = HistoryEvent::new(
            actor,
            EventType::Delete,
            TargetType::Equipment,
            id,
            target.asset_id.as_str(),
            format!("{} removed from the inventory", target.asset_id),
        );
        self.equipment.shift_remove(id);
        self.persist_equipment();
        self.record_event(event);
        Ok(Decision::allow())
    }

    /// Beneficiary confirms receipt of a delivered item: the custody state
    /// reaches CONFIRMED and the physical status flips to assigned.
    pub fn confirm_receipt(&mut self, actor: &Actor, id: &str) -> AppResult<Decision> {
        let item = self
            .equipment
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;

        if item.assignment_status != AssignmentStatus::PendingDelivery {
            let decision = Decision::deny(format!(
                "{} is {}; only a delivery pending confirmation can be confirmed",
                item.asset_id, item.assignment_status
            ));
            return Ok(self.log_denial(actor, TargetType::Equipment, id, &item.asset_id, decision));
        }

        let patch = UpdateEquipment {
            status: Some(EquipmentStatus::Assigned),
            assignment_status: Some(AssignmentStatus::Confirmed),
            confirmed_at: Some(Some(Utc::now())),
            ..UpdateEquipment::default()
        };
        self.update_equipment(actor, id, patch, None)?;
        Ok(Decision::allow())
    }

    /// Beneficiary disputes the delivered item (wrong model, damaged, …)
    pub fn dispute_delivery(
        &mut self,
        actor: &Actor,
        id: &str,
        reason: &str,
    ) -> AppResult<Decision> {
        let item = self
            .equipment
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;

        if item.assignment_status != AssignmentStatus::PendingDelivery {
            let decision = Decision::deny(format!(
                "{} is {}; only a pending delivery can be disputed",
                item.asset_id, item.assignment_status
            ));
            return Ok(self.log_denial(actor, TargetType::Equipment, id, &item.asset_id, decision));
        }

        let mut metadata = EventMetadata::new();
        metadata.insert("dispute_reason".into(), reason.to_string());
        let patch = UpdateEquipment {
            assignment_status: Some(AssignmentStatus::Disputed),
            ..UpdateEquipment::default()
        };
        self.update_equipment(actor, id, patch, Some(metadata))?;
        Ok(Decision::allow())
    }

    /// Holder asks to give the item back; it awaits inspection
    pub fn request_return(&mut self, actor: &Actor, id: &str) -> AppResult<Decision> {
        let item = self
            .equipment
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;

        if !matches!(
            item.assignment_status,
            AssignmentStatus::Confirmed | AssignmentStatus::Disputed
        ) {
            let decision = Decision::deny(format!(
                "{} is {}; only held equipment can be returned",
                item.asset_id, item.assignment_status
            ));
            return Ok(self.log_denial(actor, TargetType::Equipment, id, &item.asset_id, decision));
        }

        let patch = UpdateEquipment {
            assignment_status: Some(AssignmentStatus::PendingReturn),
            return_requested_at: Some(Some(Utc::now())),
            ..UpdateEquipment::default()
        };
        self.update_equipment(actor, id, patch, None)?;
        Ok(Decision::allow())
    }

    /// IT inspects a returned item and routes it back to stock or to repair
    pub fn inspect_return(
        &mut self,
        actor: &Actor,
        id: &str,
        to_repair: bool,
    ) -> AppResult<Decision> {
        let item = self
            .equipment
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {id} not found")))?;

        if item.assignment_status != AssignmentStatus::PendingReturn {
            let decision = Decision::deny(format!(
                "{} is {}; only a pending return can be inspected",
                item.asset_id, item.assignment_status
            ));
            return Ok(self.log_denial(actor, TargetType::Equipment, id, &item.asset_id, decision));
        }

        let now = Utc::now();
        let patch = UpdateEquipment {
            status: Some(if to_repair {
                EquipmentStatus::UnderRepair
            } else {
                EquipmentStatus::Available
            }),
            assignment_status: Some(AssignmentStatus::None),
            user: Some(None),
            user_name: Some(None),
            return_inspected_at: Some(Some(now)),
            repair_start_date: if to_repair { Some(Some(now)) } else { None },
            ..UpdateEquipment::default()
        };
        self.update_equipment(actor, id, patch, None)?;
        Ok(Decision::allow())
    }
}
