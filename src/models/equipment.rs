//! Equipment model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::{AssignmentStatus, EquipmentStatus};

/// Financial snapshot carried on the equipment record.
///
/// Owned data only; depreciation arithmetic happens outside the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialInfo {
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub depreciation_method: Option<String>,
    #[serde(default)]
    pub depreciation_years: Option<u8>,
    #[serde(default)]
    pub salvage_value: Option<f64>,
}

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    /// Unique display code (e.g. "LAP-00042")
    pub asset_id: String,
    pub equipment_type: String,
    pub model: String,
    /// Physical condition
    pub status: EquipmentStatus,
    /// Custody workflow state
    pub assignment_status: AssignmentStatus,
    /// Current holder (weak reference), null when unassigned
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_by_name: Option<String>,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub return_requested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub return_inspected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repair_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repair_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub financial: FinancialInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// Custody invariant: a holder is recorded iff the assignment status
    /// requires one, and an item physically marked assigned has a holder.
    pub fn custody_coherent(&self) -> bool {
        let holder_required = self.assignment_status.in_custody();
        if self.user.is_some() != holder_required {
            return false;
        }
        self.status != EquipmentStatus::Assigned || self.user.is_some()
    }
}

/// Create equipment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEquipment {
    /// Caller-supplied id (import pipelines); generated when absent
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "asset id must not be empty"))]
    pub asset_id: String,
    #[validate(length(min = 1, message = "equipment type must not be empty"))]
    pub equipment_type: String,
    pub model: String,
    #[serde(default)]
    pub financial: FinancialInfo,
}

/// Update equipment request (patch, absent fields are left untouched)
///
/// Holder fields use a double option so a patch can distinguish
/// "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEquipment {
    pub equipment_type: Option<String>,
    pub model: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub assignment_status: Option<AssignmentStatus>,
    #[serde(default)]
    pub user: Option<Option<String>>,
    #[serde(default)]
    pub user_name: Option<Option<String>>,
    #[serde(default)]
    pub assigned_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub assigned_by_name: Option<Option<String>>,
    #[serde(default)]
    pub confirmed_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub return_requested_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub return_inspected_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub repair_start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub repair_end_date: Option<Option<DateTime<Utc>>>,
    pub financial: Option<FinancialInfo>,
}

impl UpdateEquipment {
    /// Apply the patch to a copy of `current` and return the new record
    pub fn apply(&self, current: &Equipment, now: DateTime<Utc>) -> Equipment {
        let mut next = current.clone();
        if let Some(ref v) = self.equipment_type {
            next.equipment_type = v.clone();
        }
        if let Some(ref v) = self.model {
            next.model = v.clone();
        }
        if let Some(v) = self.status {
            next.status = v;
        }
        if let Some(v) = self.assignment_status {
            next.assignment_status = v;
        }
        if let Some(ref v) = self.user {
            next.user = v.clone();
        }
        if let Some(ref v) = self.user_name {
            next.user_name = v.clone();
        }
        if let Some(v) = self.assigned_at {
            next.assigned_at = v;
        }
        if let Some(ref v) = self.assigned_by_name {
            next.assigned_by_name = v.clone();
        }
        if let Some(v) = self.confirmed_at {
            next.confirmed_at = v;
        }
        if let Some(v) = self.return_requested_at {
            next.return_requested_at = v;
        }
        if let Some(v) = self.return_inspected_at {
            next.return_inspected_at = v;
        }
        if let Some(v) = self.repair_start_date {
            next.repair_start_date = v;
        }
        if let Some(v) = self.repair_end_date {
            next.repair_end_date = v;
        }
        if let Some(ref v) = self.financial {
            next.financial = v.clone();
        }
        next.updated_at = now;
        next
    }
}
