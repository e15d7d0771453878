//! Approval domain methods on Repository

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ApprovalStatus, AssignmentStatus, EquipmentStatus, EventType, TargetType},
        Actor, Approval, CreateApproval, Decision, EventMetadata, HistoryEvent, UpdateEquipment,
        User,
    },
    services::{authorization, lifecycle, workflow},
};

impl Repository {
    /// List all approvals in insertion order
    pub fn approvals(&self) -> Vec<&Approval> {
        self.approvals.values().collect()
    }

    /// Get an approval by id
    pub fn approval(&self, id: &str) -> Option<&Approval> {
        self.approvals.get(id)
    }

    /// Approvals still in flight for a user (as requester or beneficiary)
    pub fn active_approvals_for(&self, user_id: &str) -> Vec<&Approval> {
        self.approvals
            .values()
            .filter(|a| {
                a.is_active() && (a.requester_id == user_id || a.beneficiary_id == user_id)
            })
            .collect()
    }

    /// File a new approval request.
    ///
    /// Every request starts at WAITING_MANAGER_APPROVAL with the manager
    /// validation step pending. When the request reserves an equipment
    /// item, that item is placed in the beneficiary's custody workflow in
    /// the same logical operation.
    pub fn add_approval(&mut self, actor: &Actor, data: CreateApproval) -> AppResult<Approval> {
        data.validate()?;

        let requester = self
            .users
            .get(&data.requester_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", data.requester_id)))?;
        let beneficiary = self
            .users
            .get(&data.beneficiary_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("User {} not found", data.beneficiary_id))
            })?;

        // Reservation must be possible before anything is committed
        if let Some(eq_id) = data.assigned_equipment_id.as_deref() {
            let item = self
                .equipment
                .get(eq_id)
                .ok_or_else(|| AppError::NotFound(format!("Equipment {eq_id} not found")))?;
            if item.assignment_status != AssignmentStatus::None
                || item.status != EquipmentStatus::Available
            {
                return Err(AppError::Conflict(format!(
                    "{} is not available for reservation",
                    item.asset_id
                )));
            }
        }

        let now = Utc::now();
        let approval = Approval {
            id: data
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            requester_id: requester.id.clone(),
            requester_name: requester.name.clone(),
            requester_role: requester.role,
            beneficiary_id: beneficiary.id.clone(),
            beneficiary_name: beneficiary.name.clone(),
            is_delegated: requester.id != beneficiary.id,
            equipment_category: data.equipment_category,
            reason: data.reason,
            urgency: data.urgency,
            status: ApprovalStatus::WaitingManagerApproval,
            validation_steps: workflow::initial_steps(),
            current_step: 0,
            assigned_equipment_id: data.assigned_equipment_id.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut metadata = EventMetadata::new();
        metadata.insert("beneficiary_id".into(), beneficiary.id.clone());
        metadata.insert("beneficiary_name".into(), beneficiary.name.clone());
        metadata.insert("urgency".into(), format!("{:?}", approval.urgency).to_lowercase());
        if approval.is_delegated {
            metadata.insert("delegated_by".into(), requester.name.clone());
        }
        let event = HistoryEvent::new(
            actor,
            EventType::ApprovalCreated,
            TargetType::Approval,
            approval.id.as_str(),
            format!("Request for {}", beneficiary.name),
            format!(
                "Approval request for a {} filed for {}",
                approval.equipment_category, beneficiary.name
            ),
        )
        .with_metadata(metadata);

        self.approvals
            .insert(approval.id.clone(), approval.clone());
        self.persist_approvals();
        self.record_event(event);

        // Place the reserved item into the beneficiary's custody workflow
        if let Some(eq_id) = approval.assigned_equipment_id.clone() {
            let patch = UpdateEquipment {
                assignment_status: Some(AssignmentStatus::WaitingManagerApproval),
                user: Some(Some(beneficiary.id.clone())),
                user_name: Some(Some(beneficiary.name.clone())),
                ..UpdateEquipment::default()
            };
            self.update_equipment(actor, &eq_id, patch, None)?;
        }

        Ok(approval)
    }

    /// Move an approval to `next_status`.
    ///
    /// The guard decides, the workflow machine computes the new approval
    /// state and the equipment side effect, and both are committed as one
    /// logical operation: if the equipment patch cannot be applied, the
    /// approval transition is not committed either.
    pub fn update_approval(
        &mut self,
        actor: &Actor,
        id: &str,
        next_status: ApprovalStatus,
    ) -> AppResult<Decision> {
        let approval = self
            .approvals
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Approval {id} not found")))?;

        let users: Vec<&User> = self.users.values().collect();
        let decision = authorization::can_transition_approval(&approval, next_status, actor, &users);
        if !decision.allowed {
            let target_name = format!("Request for {}", approval.beneficiary_name);
            return Ok(self.log_denial(actor, TargetType::Approval, id, &target_name, decision));
        }

        let now = Utc::now();
        let outcome = workflow::apply_transition(&approval, next_status, actor, now);

        // Compute the equipment commit before touching anything, so a
        // missing reservation aborts the whole operation.
        let equipment_commit = match (
            approval.assigned_equipment_id.as_deref(),
            outcome.equipment_patch.as_ref(),
        ) {
            (Some(eq_id), Some(patch)) => {
                let old = self.equipment.get(eq_id).cloned().ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Equipment {eq_id} reserved by approval {id} not found"
                    ))
                })?;
                let new = patch.apply(&old, now);
                let change = lifecycle::classify(&old, &new);
                Some((new, change))
            }
            _ => None,
        };

        let mut metadata = EventMetadata::new();
        metadata.insert("from_status".into(), approval.status.as_str().into());
        metadata.insert("to_status".into(), next_status.as_str().into());
        let approval_event = HistoryEvent::new(
            actor,
            outcome.event_type,
            TargetType::Approval,
            id,
            format!("Request for {}", approval.beneficiary_name),
            outcome.description.clone(),
        )
        .with_metadata(metadata);

        self.approvals
            .insert(id.to_string(), outcome.approval);
        self.persist_approvals();
        self.record_event(approval_event);

        if let Some((new_item, change)) = equipment_commit {
            let equipment_event = HistoryEvent::new(
                actor,
                change.event_type,
                TargetType::Equipment,
                new_item.id.as_str(),
                new_item.asset_id.as_str(),
                change.description,
            )
            .with_metadata(change.metadata);
            self.equipment.insert(new_item.id.clone(), new_item);
            self.persist_equipment();
            self.record_event(equipment_event);
        }

        Ok(Decision::allow())
    }
}
