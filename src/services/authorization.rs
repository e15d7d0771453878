//! Authorization guard: pure decision functions
//!
//! One function per protected action. Each takes the current entity
//! snapshots, the proposed change and the acting user, and returns a
//! [`Decision`]. Never an error, never a side effect. Denial logging is
//! the caller's job (the repository records every denial as a sensitive
//! audit event).

use crate::models::{
    enums::{ApprovalStatus, EquipmentStatus, EventType, Role, TargetType},
    Actor, Approval, CreateUser, Decision, Equipment, HistoryEvent, UpdateUser, User,
};

use super::workflow;

/// Guard for creating a user
pub fn can_create_user(actor: &Actor, data: &CreateUser, users: &[&User]) -> Decision {
    if !actor.role.is_admin() {
        return Decision::deny("Only administrators may create users");
    }
    if data.role.rank() > actor.role.rank() {
        return Decision::deny(format!(
            "You cannot create a {} account with your {} role",
            data.role, actor.role
        ));
    }
    if users.iter().any(|u| u.email == data.email) {
        return Decision::deny(format!("A user with email {} already exists", data.email));
    }
    Decision::allow()
}

/// Guard for deleting a user
pub fn can_delete_user(
    actor: &Actor,
    target: &User,
    users: &[&User],
    equipment: &[&Equipment],
    approvals: &[&Approval],
) -> Decision {
    let held: Vec<&str> = equipment
        .iter()
        .filter(|e| e.user.as_deref() == Some(target.id.as_str()))
        .map(|e| e.asset_id.as_str())
        .collect();
    if !held.is_empty() {
        return Decision::deny(format!(
            "{} still has equipment assigned ({}); return it first",
            target.name,
            held.join(", ")
        ));
    }

    if approvals
        .iter()
        .any(|a| a.is_active() && (a.requester_id == target.id || a.beneficiary_id == target.id))
    {
        return Decision::deny(format!(
            "{} is involved in an approval request that is still in progress",
            target.name
        ));
    }

    if target.role == Role::SuperAdmin {
        let remaining = users
            .iter()
            .filter(|u| u.role == Role::SuperAdmin && u.is_active() && u.id != target.id)
            .count();
        if remaining == 0 {
            return Decision::deny("Cannot delete the last active SuperAdmin");
        }
    }

    if actor.id == target.id && target.role.is_admin() {
        return Decision::deny(format!(
            "A {} cannot delete their own account",
            target.role
        ));
    }

    if target.role == Role::SuperAdmin {
        if actor.role != Role::SuperAdmin {
            return Decision::deny("Only a SuperAdmin may delete a SuperAdmin");
        }
    } else if actor.role.rank() <= target.role.rank() && actor.id != target.id {
        return Decision::deny(format!(
            "Your {} role does not outrank the {} you are trying to delete",
            actor.role, target.role
        ));
    }

    Decision::allow()
}

/// Guard for updating a user
pub fn can_update_user(
    actor: &Actor,
    target: &User,
    patch: &UpdateUser,
    approvals: &[&Approval],
) -> Decision {
    if target.role == Role::SuperAdmin && actor.role != Role::SuperAdmin {
        return Decision::deny("Only a SuperAdmin may edit a SuperAdmin account");
    }

    // Role/department edits would re-route a manager validation mid-flight
    if patch.changes_routing(target) {
        let waiting = approvals.iter().any(|a| {
            a.status == ApprovalStatus::WaitingManagerApproval && a.beneficiary_id == target.id
        });
        if waiting {
            return Decision::deny(format!(
                "{} has an approval request awaiting manager validation; role and department cannot change until it is resolved",
                target.name
            ));
        }
    }

    Decision::allow()
}

/// Guard for deleting an equipment item
pub fn can_delete_equipment(equipment: &Equipment, events: &[&HistoryEvent]) -> Decision {
    if !matches!(
        equipment.status,
        EquipmentStatus::Available | EquipmentStatus::UnderRepair
    ) {
        return Decision::deny(format!(
            "{} is currently {}; equipment in custody cannot be deleted",
            equipment.asset_id, equipment.status
        ));
    }

    let has_history = events.iter().any(|ev| {
        ev.target_type == TargetType::Equipment
            && ev.target_id == equipment.id
            && ev.event_type != EventType::Create
    });
    if has_history {
        return Decision::deny(format!(
            "{} has a service record; items with history are archived, not deleted",
            equipment.asset_id
        ));
    }

    Decision::allow()
}

/// Guard for moving an approval request to `next`
pub fn can_transition_approval(
    approval: &Approval,
    next: ApprovalStatus,
    actor: &Actor,
    users: &[&User],
) -> Decision {
    if !workflow::is_transition_allowed(approval.status, next) {
        return Decision::deny(format!(
            "An approval cannot move from {} to {}",
            approval.status, next
        ));
    }

    match approval.status {
        ApprovalStatus::WaitingManagerApproval => {
            let beneficiary = users.iter().find(|u| u.id == approval.beneficiary_id);
            match beneficiary {
                Some(b) if b.manager_id.as_deref() == Some(actor.id.as_str()) => Decision::allow(),
                Some(b) => Decision::deny(format!(
                    "Only the direct manager of {} may act on this validation step",
                    b.name
                )),
                None => Decision::deny(format!(
                    "Beneficiary {} is no longer in the directory",
                    approval.beneficiary_name
                )),
            }
        }
        ApprovalStatus::WaitingItProcessing => {
            if actor.role.is_admin() {
                Decision::allow()
            } else {
                Decision::deny("Only IT administrators may complete this validation step")
            }
        }
        // Terminal statuses never pass the adjacency check above
        ApprovalStatus::Approved | ApprovalStatus::Rejected => {
            Decision::deny(format!("{} is a terminal status", approval.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{AssignmentStatus, StepStatus, Urgency, UserStatus};
    use crate::models::{FinancialInfo, ValidationStep};
    use chrono::Utc;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: format!("user {id}"),
            email: format!("{id}@corp.example"),
            role,
            department: "IT".to_string(),
            manager_id: None,
            status: UserStatus::Active,
        }
    }

    fn laptop(id: &str, holder: Option<&str>) -> Equipment {
        let now = Utc::now();
        Equipment {
            id: id.to_string(),
            asset_id: format!("LAP-{id}"),
            equipment_type: "laptop".to_string(),
            model: "ThinkPad T14".to_string(),
            status: if holder.is_some() {
                EquipmentStatus::Assigned
            } else {
                EquipmentStatus::Available
            },
            assignment_status: if holder.is_some() {
                AssignmentStatus::Confirmed
            } else {
                AssignmentStatus::None
            },
            user: holder.map(str::to_string),
            user_name: holder.map(str::to_string),
            assigned_at: None,
            assigned_by_name: None,
            confirmed_at: None,
            return_requested_at: None,
            return_inspected_at: None,
            repair_start_date: None,
            repair_end_date: None,
            financial: FinancialInfo::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn request(beneficiary: &str, status: ApprovalStatus) -> Approval {
        let now = Utc::now();
        Approval {
            id: "apr-1".to_string(),
            requester_id: beneficiary.to_string(),
            requester_name: beneficiary.to_string(),
            requester_role: Role::User,
            beneficiary_id: beneficiary.to_string(),
            beneficiary_name: beneficiary.to_string(),
            is_delegated: false,
            equipment_category: "laptop".to_string(),
            reason: "onboarding".to_string(),
            urgency: Urgency::Normal,
            status,
            validation_steps: vec![ValidationStep {
                role: Role::Manager,
                status: StepStatus::Pending,
                validated_at: None,
                validated_by: None,
            }],
            current_step: 0,
            assigned_equipment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn delete_user_denied_while_holding_equipment() {
        let admin = Actor::new("a", "admin", Role::Admin);
        let target = user("t", Role::User);
        let eq = laptop("1", Some("t"));
        let users = [&target];
        let d = can_delete_user(&admin, &target, &users, &[&eq], &[]);
        assert!(!d.allowed);
        assert!(d.reason.unwrap().contains("equipment"));
    }

    #[test]
    fn delete_user_denied_with_active_approval() {
        let admin = Actor::new("a", "admin", Role::Admin);
        let target = user("t", Role::User);
        let apr = request("t", ApprovalStatus::WaitingItProcessing);
        let users = [&target];
        let d = can_delete_user(&admin, &target, &users, &[], &[&apr]);
        assert!(!d.allowed);
    }

    #[test]
    fn last_active_superadmin_is_protected() {
        let actor = Actor::new("sa", "root", Role::SuperAdmin);
        let target = user("sa", Role::SuperAdmin);
        let other_inactive = User {
            status: UserStatus::Inactive,
            ..user("sa2", Role::SuperAdmin)
        };
        let users = [&target, &other_inactive];
        let d = can_delete_user(&actor, &target, &users, &[], &[]);
        assert!(!d.allowed);
        assert!(d.reason.unwrap().contains("SuperAdmin"));
    }

    #[test]
    fn superadmin_not_deletable_by_admin() {
        let actor = Actor::new("a", "admin", Role::Admin);
        let target = user("sa", Role::SuperAdmin);
        let spare = user("sa2", Role::SuperAdmin);
        let users = [&target, &spare];
        let d = can_delete_user(&actor, &target, &users, &[], &[]);
        assert!(!d.allowed);
    }

    #[test]
    fn admin_deletes_plain_user() {
        let actor = Actor::new("a", "admin", Role::Admin);
        let target = user("t", Role::User);
        let users = [&target];
        assert!(can_delete_user(&actor, &target, &users, &[], &[]).allowed);
    }

    #[test]
    fn routing_fields_frozen_during_manager_validation() {
        let actor = Actor::new("a", "admin", Role::Admin);
        let target = user("t", Role::User);
        let apr = request("t", ApprovalStatus::WaitingManagerApproval);
        let patch = UpdateUser {
            department: Some("Finance".to_string()),
            ..UpdateUser::default()
        };
        let d = can_update_user(&actor, &target, &patch, &[&apr]);
        assert!(!d.allowed);

        // Untouched routing fields pass
        let patch = UpdateUser {
            name: Some("renamed".to_string()),
            ..UpdateUser::default()
        };
        assert!(can_update_user(&actor, &target, &patch, &[&apr]).allowed);
    }

    #[test]
    fn equipment_in_custody_not_deletable() {
        let eq = laptop("1", Some("t"));
        assert!(!can_delete_equipment(&eq, &[]).allowed);
    }

    #[test]
    fn equipment_with_service_record_not_deletable() {
        let eq = laptop("1", None);
        let actor = Actor::new("a", "admin", Role::Admin);
        let create = HistoryEvent::new(
            &actor,
            EventType::Create,
            TargetType::Equipment,
            eq.id.clone(),
            eq.asset_id.clone(),
            "created",
        );
        let repair = HistoryEvent::new(
            &actor,
            EventType::RepairStart,
            TargetType::Equipment,
            eq.id.clone(),
            eq.asset_id.clone(),
            "sent to repair",
        );
        assert!(can_delete_equipment(&eq, &[&create]).allowed);
        assert!(!can_delete_equipment(&eq, &[&create, &repair]).allowed);
    }

    #[test]
    fn manager_step_requires_direct_manager() {
        let mut beneficiary = user("b", Role::User);
        beneficiary.manager_id = Some("m".to_string());
        let manager = user("m", Role::Manager);
        let users = [&beneficiary, &manager];
        let apr = request("b", ApprovalStatus::WaitingManagerApproval);

        let right = Actor::new("m", "manager", Role::Manager);
        assert!(
            can_transition_approval(&apr, ApprovalStatus::WaitingItProcessing, &right, &users)
                .allowed
        );

        let wrong = Actor::new("a", "admin", Role::Admin);
        assert!(
            !can_transition_approval(&apr, ApprovalStatus::WaitingItProcessing, &wrong, &users)
                .allowed
        );
    }

    #[test]
    fn it_step_requires_admin() {
        let beneficiary = user("b", Role::User);
        let users = [&beneficiary];
        let apr = request("b", ApprovalStatus::WaitingItProcessing);

        let manager = Actor::new("m", "manager", Role::Manager);
        assert!(!can_transition_approval(&apr, ApprovalStatus::Approved, &manager, &users).allowed);

        let admin = Actor::new("a", "admin", Role::Admin);
        assert!(can_transition_approval(&apr, ApprovalStatus::Approved, &admin, &users).allowed);
    }

    #[test]
    fn terminal_statuses_reject_everything() {
        let beneficiary = user("b", Role::User);
        let users = [&beneficiary];
        let apr = request("b", ApprovalStatus::Approved);
        let admin = Actor::new("a", "admin", Role::SuperAdmin);
        let d = can_transition_approval(
            &apr,
            ApprovalStatus::WaitingManagerApproval,
            &admin,
            &users,
        );
        assert!(!d.allowed);
    }
}
