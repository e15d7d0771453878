//! Approval workflow state machine
//!
//! The validation path is fixed:
//!
//! ```text
//! WAITING_MANAGER_APPROVAL ──▶ WAITING_IT_PROCESSING ──▶ Approved
//!            │                          │
//!            └──────────────▶ Rejected ◀┘
//! ```
//!
//! `Approved` and `Rejected` are terminal. The guard rejects anything
//! outside this adjacency before the machine runs; the machine itself
//! computes the new approval state and the equipment-side effect as pure
//! values for the repository to commit atomically.

use chrono::{DateTime, Utc};

use crate::models::{
    enums::{ApprovalStatus, AssignmentStatus, EventType, Role, StepStatus},
    Actor, Approval, UpdateEquipment, ValidationStep,
};

/// Total adjacency of the approval state machine
pub fn transitions(status: ApprovalStatus) -> &'static [ApprovalStatus] {
    match status {
        ApprovalStatus::WaitingManagerApproval => &[
            ApprovalStatus::WaitingItProcessing,
            ApprovalStatus::Rejected,
        ],
        ApprovalStatus::WaitingItProcessing => {
            &[ApprovalStatus::Approved, ApprovalStatus::Rejected]
        }
        ApprovalStatus::Approved | ApprovalStatus::Rejected => &[],
    }
}

pub fn is_transition_allowed(from: ApprovalStatus, to: ApprovalStatus) -> bool {
    transitions(from).contains(&to)
}

/// Validation steps every new request starts with
pub fn initial_steps() -> Vec<ValidationStep> {
    vec![ValidationStep::pending(Role::Manager)]
}

/// Result of applying a transition: the updated approval, the equipment
/// patch to apply when the request reserved an item, and the audit
/// classification of the approval-side event.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub approval: Approval,
    pub equipment_patch: Option<UpdateEquipment>,
    pub event_type: EventType,
    pub description: String,
}

/// Compute the full outcome of moving `approval` to `next`.
///
/// Pure: no lookups, no clock reads. Callers must have cleared the guard
/// first; `next` is assumed to be a legal successor of the current status.
pub fn apply_transition(
    approval: &Approval,
    next: ApprovalStatus,
    actor: &Actor,
    now: DateTime<Utc>,
) -> TransitionOutcome {
    let mut updated = approval.clone();
    updated.status = next;
    updated.updated_at = now;

    let stamp = |step: &mut ValidationStep, status: StepStatus| {
        step.status = status;
        step.validated_at = Some(now);
        step.validated_by = Some(actor.name.clone());
    };

    match next {
        ApprovalStatus::WaitingItProcessing => {
            if let Some(step) = updated.validation_steps.get_mut(approval.current_step) {
                stamp(step, StepStatus::Validated);
            }
            updated.validation_steps.push(ValidationStep::pending(Role::Admin));
            updated.current_step = approval.current_step + 1;

            TransitionOutcome {
                approval: updated,
                equipment_patch: Some(UpdateEquipment {
                    assignment_status: Some(AssignmentStatus::WaitingItProcessing),
                    ..UpdateEquipment::default()
                }),
                event_type: EventType::ApprovalStepValidated,
                description: format!(
                    "Manager validation passed for {}; handed to IT",
                    approval.beneficiary_name
                ),
            }
        }
        ApprovalStatus::Approved => {
            if let Some(step) = updated.validation_steps.get_mut(approval.current_step) {
                stamp(step, StepStatus::Validated);
            }

            // Physical status stays Disponible until the beneficiary
            // confirms receipt; only the custody workflow advances here.
            TransitionOutcome {
                approval: updated,
                equipment_patch: Some(UpdateEquipment {
                    assignment_status: Some(AssignmentStatus::PendingDelivery),
                    assigned_at: Some(Some(now)),
                    assigned_by_name: Some(Some(actor.name.clone())),
                    ..UpdateEquipment::default()
                }),
                event_type: EventType::ApprovalApproved,
                description: format!(
                    "Request approved; equipment reserved for {} pending delivery",
                    approval.beneficiary_name
                ),
            }
        }
        ApprovalStatus::Rejected => {
            if let Some(step) = updated.validation_steps.get_mut(approval.current_step) {
                stamp(step, StepStatus::Rejected);
            }

            // Release the reservation entirely
            TransitionOutcome {
                approval: updated,
                equipment_patch: Some(UpdateEquipment {
                    assignment_status: Some(AssignmentStatus::None),
                    user: Some(None),
                    user_name: Some(None),
                    assigned_at: Some(None),
                    assigned_by_name: Some(None),
                    ..UpdateEquipment::default()
                }),
                event_type: EventType::ApprovalRejected,
                description: format!(
                    "Request rejected at the {} step",
                    approval
                        .current_validation_step()
                        .map(|s| s.role.to_string())
                        .unwrap_or_else(|| "current".to_string())
                ),
            }
        }
        // Not reachable through the adjacency; kept total for exhaustiveness
        ApprovalStatus::WaitingManagerApproval => TransitionOutcome {
            approval: updated,
            equipment_patch: None,
            event_type: EventType::Update,
            description: "Approval status updated".to_string(),
        },
    }
}
