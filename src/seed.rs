//! Bundled seed dataset
//!
//! Loaded when the store has no (or corrupt) data for a collection.
//! Seeded records are merged into persisted data by id, so redeploying
//! with a newer seed never erases records the users created.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;

use crate::models::{
    enums::{AssignmentStatus, EquipmentStatus, Role, UserStatus},
    Equipment, FinancialInfo, Settings, User,
};

/// Fixed creation stamp for seeded records, so seeding is deterministic
static SEED_STAMP: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());

pub fn users() -> Vec<User> {
    let user = |id: &str, name: &str, email: &str, role, department: &str, manager_id: Option<&str>| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        department: department.to_string(),
        manager_id: manager_id.map(str::to_string),
        status: UserStatus::Active,
    };

    vec![
        user(
            "usr-root",
            "Nadia Roussel",
            "nadia.roussel@corp.example",
            Role::SuperAdmin,
            "Direction",
            None,
        ),
        user(
            "usr-it-admin",
            "Iris Lambert",
            "iris.lambert@corp.example",
            Role::Admin,
            "IT",
            Some("usr-root"),
        ),
        user(
            "usr-mgr-sales",
            "Marc Dupont",
            "marc.dupont@corp.example",
            Role::Manager,
            "Sales",
            Some("usr-root"),
        ),
        user(
            "usr-sales-1",
            "Alice Moreau",
            "alice.moreau@corp.example",
            Role::User,
            "Sales",
            Some("usr-mgr-sales"),
        ),
        user(
            "usr-sales-2",
            "Benoît Carre",
            "benoit.carre@corp.example",
            Role::User,
            "Sales",
            Some("usr-mgr-sales"),
        ),
    ]
}

pub fn equipment() -> Vec<Equipment> {
    let item = |id: &str, asset_id: &str, kind: &str, model: &str, status| Equipment {
        id: id.to_string(),
        asset_id: asset_id.to_string(),
        equipment_type: kind.to_string(),
        model: model.to_string(),
        status,
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
        financial: FinancialInfo {
            purchase_price: Some(1200.0),
            purchase_date: Some(*SEED_STAMP),
            depreciation_method: Some("linear".to_string()),
            depreciation_years: Some(3),
            salvage_value: Some(100.0),
        },
        created_at: *SEED_STAMP,
        updated_at: *SEED_STAMP,
    };

    let mut items = vec![
        item("eq-lap-1", "LAP-00001", "laptop", "ThinkPad T14", EquipmentStatus::Available),
        item("eq-lap-2", "LAP-00002", "laptop", "MacBook Pro 14", EquipmentStatus::Available),
        item("eq-mon-1", "MON-00001", "monitor", "Dell U2723QE", EquipmentStatus::Available),
    ];
    let mut in_repair = item(
        "eq-lap-3",
        "LAP-00003",
        "laptop",
        "ThinkPad X1",
        EquipmentStatus::UnderRepair,
    );
    in_repair.repair_start_date = Some(*SEED_STAMP);
    items.push(in_repair);
    items
}

pub fn settings() -> Settings {
    Settings::default()
}

/// Merge seeded records into persisted ones, keyed by id.
///
/// Persisted records always win; only seed records whose id is absent
/// are appended. Upgrades can therefore add reference data without
/// touching what users changed.
pub fn merge_by_id<T, F>(persisted: Vec<T>, seeded: Vec<T>, id_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut merged = persisted;
    for record in seeded {
        if !merged.iter().any(|existing| id_of(existing) == id_of(&record)) {
            merged.push(record);
        }
    }
    merged
}
