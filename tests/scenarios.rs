//! End-to-end workflow scenarios over the repository surface

use assetflow::{
    models::{
        enums::{
            ApprovalStatus, AssignmentStatus, EquipmentStatus, EventType, Role, TargetType,
        },
        Actor, CreateApproval, CreateEquipment, CreateUser, UpdateUser,
    },
    AppError, Repository,
};

fn superadmin() -> Actor {
    Actor::new("usr-root", "Nadia Roussel", Role::SuperAdmin)
}

fn admin() -> Actor {
    Actor::new("usr-it", "Iris Lambert", Role::Admin)
}

fn manager() -> Actor {
    Actor::new("usr-mgr", "Marc Dupont", Role::Manager)
}

fn alice() -> Actor {
    Actor::new("usr-alice", "Alice Moreau", Role::User)
}

/// Directory with a SuperAdmin, an IT Admin, a manager and their report,
/// plus one available laptop ("eq-1").
fn engine() -> Repository {
    let mut repo = Repository::new();
    let root = superadmin();

    let user = |id: &str, name: &str, role, manager_id: Option<&str>| CreateUser {
        id: Some(id.to_string()),
        name: name.to_string(),
        email: format!("{id}@corp.example"),
        role,
        department: "Sales".to_string(),
        manager_id: manager_id.map(str::to_string),
    };

    for data in [
        user("usr-root", "Nadia Roussel", Role::SuperAdmin, None),
        user("usr-it", "Iris Lambert", Role::Admin, Some("usr-root")),
        user("usr-mgr", "Marc Dupont", Role::Manager, Some("usr-root")),
        user("usr-alice", "Alice Moreau", Role::User, Some("usr-mgr")),
    ] {
        let decision = repo.add_user(&root, data).unwrap();
        assert!(decision.allowed);
    }

    repo.add_equipment(
        &admin(),
        CreateEquipment {
            id: Some("eq-1".to_string()),
            asset_id: "LAP-00001".to_string(),
            equipment_type: "laptop".to_string(),
            model: "ThinkPad T14".to_string(),
            financial: Default::default(),
        },
    )
    .unwrap();

    repo
}

fn file_request(repo: &mut Repository) {
    repo.add_approval(
        &alice(),
        CreateApproval {
            id: Some("apr-1".to_string()),
            requester_id: "usr-alice".to_string(),
            beneficiary_id: "usr-alice".to_string(),
            equipment_category: "laptop".to_string(),
            reason: "replacement for a broken unit".to_string(),
            urgency: Default::default(),
            assigned_equipment_id: Some("eq-1".to_string()),
        },
    )
    .unwrap();
}

#[test]
fn full_approval_flow_synchronizes_equipment() {
    let mut repo = engine();
    file_request(&mut repo);

    // Reservation places the item in the beneficiary's custody workflow
    let item = repo.equipment("eq-1").unwrap();
    assert_eq!(
        item.assignment_status,
        AssignmentStatus::WaitingManagerApproval
    );
    assert_eq!(item.user.as_deref(), Some("usr-alice"));
    assert_eq!(item.status, EquipmentStatus::Available);

    // Manager validation hands the request to IT
    let d = repo
        .update_approval(&manager(), "apr-1", ApprovalStatus::WaitingItProcessing)
        .unwrap();
    assert!(d.allowed);
    assert_eq!(
        repo.equipment("eq-1").unwrap().assignment_status,
        AssignmentStatus::WaitingItProcessing
    );

    // IT approval reserves for delivery without flipping physical status
    let d = repo
        .update_approval(&admin(), "apr-1", ApprovalStatus::Approved)
        .unwrap();
    assert!(d.allowed);
    let item = repo.equipment("eq-1").unwrap();
    assert_eq!(item.assignment_status, AssignmentStatus::PendingDelivery);
    assert!(item.assigned_at.is_some());
    assert_eq!(item.assigned_by_name.as_deref(), Some("Iris Lambert"));
    assert_eq!(item.status, EquipmentStatus::Available);

    // Receipt confirmation is the separate step that assigns physically
    let d = repo.confirm_receipt(&alice(), "eq-1").unwrap();
    assert!(d.allowed);
    let item = repo.equipment("eq-1").unwrap();
    assert_eq!(item.assignment_status, AssignmentStatus::Confirmed);
    assert_eq!(item.status, EquipmentStatus::Assigned);
    assert!(item.confirmed_at.is_some());

    // Audit trail carries the full progression, one event per mutation
    let types: Vec<EventType> = repo
        .events_for_target(TargetType::Equipment, "eq-1")
        .iter()
        .map(|ev| ev.event_type)
        .collect();
    assert_eq!(
        types,
        vec![
            EventType::Create,
            EventType::AssignManagerWait,
            EventType::AssignItProcessing,
            EventType::AssignPending,
            EventType::AssignConfirmed,
        ]
    );

    let approval_types: Vec<EventType> = repo
        .events_for_target(TargetType::Approval, "apr-1")
        .iter()
        .map(|ev| ev.event_type)
        .collect();
    assert_eq!(
        approval_types,
        vec![
            EventType::ApprovalCreated,
            EventType::ApprovalStepValidated,
            EventType::ApprovalApproved,
        ]
    );
}

#[test]
fn rejection_releases_the_reservation() {
    let mut repo = engine();
    file_request(&mut repo);

    repo.update_approval(&manager(), "apr-1", ApprovalStatus::WaitingItProcessing)
        .unwrap();
    let d = repo
        .update_approval(&admin(), "apr-1", ApprovalStatus::Rejected)
        .unwrap();
    assert!(d.allowed);

    let item = repo.equipment("eq-1").unwrap();
    assert_eq!(item.assignment_status, AssignmentStatus::None);
    assert!(item.user.is_none());
    assert_eq!(item.status, EquipmentStatus::Available);
    assert_eq!(
        repo.approval("apr-1").unwrap().status,
        ApprovalStatus::Rejected
    );
}

#[test]
fn approval_status_never_moves_backwards() {
    let mut repo = engine();
    file_request(&mut repo);

    // Skipping the manager step is not in the adjacency
    let d = repo
        .update_approval(&admin(), "apr-1", ApprovalStatus::Approved)
        .unwrap();
    assert!(!d.allowed);

    repo.update_approval(&manager(), "apr-1", ApprovalStatus::WaitingItProcessing)
        .unwrap();
    repo.update_approval(&admin(), "apr-1", ApprovalStatus::Approved)
        .unwrap();

    // Terminal means terminal
    let d = repo
        .update_approval(&admin(), "apr-1", ApprovalStatus::WaitingManagerApproval)
        .unwrap();
    assert!(!d.allowed);
    assert_eq!(
        repo.approval("apr-1").unwrap().status,
        ApprovalStatus::Approved
    );
}

#[test]
fn denied_transition_leaves_a_sensitive_audit_event() {
    let mut repo = engine();
    file_request(&mut repo);

    // Alice is not her own manager
    let d = repo
        .update_approval(&alice(), "apr-1", ApprovalStatus::WaitingItProcessing)
        .unwrap();
    assert!(!d.allowed);
    assert!(d.reason.is_some());

    let denials: Vec<_> = repo
        .events_for_target(TargetType::Approval, "apr-1")
        .into_iter()
        .filter(|ev| ev.event_type == EventType::AccessDenied)
        .collect();
    assert_eq!(denials.len(), 1);
    assert!(denials[0].is_sensitive);
    // Equipment untouched
    assert_eq!(
        repo.equipment("eq-1").unwrap().assignment_status,
        AssignmentStatus::WaitingManagerApproval
    );
}

#[test]
fn user_holding_equipment_cannot_be_deleted() {
    let mut repo = engine();
    file_request(&mut repo);

    let d = repo.delete_user(&superadmin(), "usr-alice").unwrap();
    assert!(!d.allowed);
    assert!(repo.user("usr-alice").is_some());
}

#[test]
fn sole_active_superadmin_cannot_be_deleted() {
    let mut repo = engine();
    let d = repo.delete_user(&superadmin(), "usr-root").unwrap();
    assert!(!d.allowed);
    assert!(d.reason.unwrap().contains("SuperAdmin"));
}

#[test]
fn equipment_deletion_respects_custody_and_history() {
    let mut repo = engine();
    file_request(&mut repo);
    repo.update_approval(&manager(), "apr-1", ApprovalStatus::WaitingItProcessing)
        .unwrap();
    repo.update_approval(&admin(), "apr-1", ApprovalStatus::Approved)
        .unwrap();
    repo.confirm_receipt(&alice(), "eq-1").unwrap();

    // Physically assigned: protected
    let d = repo.delete_equipment(&admin(), "eq-1").unwrap();
    assert!(!d.allowed);

    // Fresh item with nothing but its creation event: deletable
    repo.add_equipment(
        &admin(),
        CreateEquipment {
            id: Some("eq-2".to_string()),
            asset_id: "MON-00001".to_string(),
            equipment_type: "monitor".to_string(),
            model: "Dell U2723QE".to_string(),
            financial: Default::default(),
        },
    )
    .unwrap();
    let d = repo.delete_equipment(&admin(), "eq-2").unwrap();
    assert!(d.allowed);
    assert!(repo.equipment("eq-2").is_none());
}

#[test]
fn routing_fields_frozen_while_manager_validation_pending() {
    let mut repo = engine();
    file_request(&mut repo);

    let patch = UpdateUser {
        department: Some("Finance".to_string()),
        ..UpdateUser::default()
    };
    let d = repo.update_user(&admin(), "usr-alice", patch).unwrap();
    assert!(!d.allowed);

    // Once the manager signed off, the freeze lifts
    repo.update_approval(&manager(), "apr-1", ApprovalStatus::WaitingItProcessing)
        .unwrap();
    let patch = UpdateUser {
        department: Some("Finance".to_string()),
        ..UpdateUser::default()
    };
    let d = repo.update_user(&admin(), "usr-alice", patch).unwrap();
    assert!(d.allowed);
}

#[test]
fn unknown_ids_fail_fast_instead_of_denying() {
    let mut repo = engine();
    let err = repo
        .update_approval(&admin(), "apr-missing", ApprovalStatus::Rejected)
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = repo.delete_user(&superadmin(), "usr-ghost").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn return_flow_routes_to_repair_and_back() {
    let mut repo = engine();
    file_request(&mut repo);
    repo.update_approval(&manager(), "apr-1", ApprovalStatus::WaitingItProcessing)
        .unwrap();
    repo.update_approval(&admin(), "apr-1", ApprovalStatus::Approved)
        .unwrap();
    repo.confirm_receipt(&alice(), "eq-1").unwrap();

    let d = repo.request_return(&alice(), "eq-1").unwrap();
    assert!(d.allowed);
    assert_eq!(
        repo.equipment("eq-1").unwrap().assignment_status,
        AssignmentStatus::PendingReturn
    );

    let d = repo.inspect_return(&admin(), "eq-1", true).unwrap();
    assert!(d.allowed);
    let item = repo.equipment("eq-1").unwrap();
    assert!(item.user.is_none());
    assert_eq!(item.assignment_status, AssignmentStatus::None);
    assert_eq!(item.status, EquipmentStatus::UnderRepair);
    assert!(item.return_inspected_at.is_some());

    // The return event carries the inspection outcome
    let last = repo
        .events_for_target(TargetType::Equipment, "eq-1")
        .pop()
        .unwrap()
        .clone();
    assert_eq!(last.event_type, EventType::Return);
    assert!(last.description.contains("sent to repair"));
}

#[test]
fn timeline_reconciliation_is_idempotent() {
    let mut repo = engine();
    file_request(&mut repo);
    repo.update_approval(&manager(), "apr-1", ApprovalStatus::WaitingItProcessing)
        .unwrap();
    repo.update_approval(&admin(), "apr-1", ApprovalStatus::Approved)
        .unwrap();
    repo.confirm_receipt(&alice(), "eq-1").unwrap();

    let first = repo.equipment_timeline("eq-1").unwrap();
    let second = repo.equipment_timeline("eq-1").unwrap();
    assert_eq!(first, second);
    assert!(!first.is_empty());

    // Newest first
    for pair in first.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}

#[test]
fn snapshots_survive_a_reload() {
    use assetflow::SnapshotStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.db");

    {
        let store = SnapshotStore::open(&path).unwrap();
        let mut repo = Repository::load(store, true);
        repo.add_equipment(
            &admin(),
            CreateEquipment {
                id: Some("eq-extra".to_string()),
                asset_id: "LAP-09999".to_string(),
                equipment_type: "laptop".to_string(),
                model: "MacBook Air".to_string(),
                financial: Default::default(),
            },
        )
        .unwrap();
    }

    let store = SnapshotStore::open(&path).unwrap();
    let repo = Repository::load(store, true);
    let item = repo.equipment("eq-extra").unwrap();
    assert_eq!(item.asset_id, "LAP-09999");
    // Seed records merged in alongside the persisted ones
    assert!(repo.equipment("eq-lap-1").is_some());
    // The creation event survived too
    assert!(!repo
        .events_for_target(TargetType::Equipment, "eq-extra")
        .is_empty());
}
