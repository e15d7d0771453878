//! Approval request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::{ApprovalStatus, Role, StepStatus, Urgency};

/// One stage in an approval's required sign-off sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationStep {
    pub role: Role,
    pub status: StepStatus,
    #[serde(default)]
    pub validated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub validated_by: Option<String>,
}

impl ValidationStep {
    pub fn pending(role: Role) -> Self {
        Self {
            role,
            status: StepStatus::Pending,
            validated_at: None,
            validated_by: None,
        }
    }
}

/// Approval request record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub requester_role: Role,
    pub beneficiary_id: String,
    pub beneficiary_name: String,
    /// True when the requester files on behalf of someone else
    pub is_delegated: bool,
    pub equipment_category: String,
    pub reason: String,
    pub urgency: Urgency,
    pub status: ApprovalStatus,
    pub validation_steps: Vec<ValidationStep>,
    pub current_step: usize,
    /// Equipment reserved for this request (weak reference, immutable once set)
    #[serde(default)]
    pub assigned_equipment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Approval {
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// The validation step currently awaiting sign-off
    pub fn current_validation_step(&self) -> Option<&ValidationStep> {
        self.validation_steps.get(self.current_step)
    }
}

/// Create approval request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApproval {
    /// Caller-supplied id (import pipelines); generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub requester_id: String,
    pub beneficiary_id: String,
    #[validate(length(min = 1, message = "equipment category must not be empty"))]
    pub equipment_category: String,
    #[validate(length(min = 1, message = "reason must not be empty"))]
    pub reason: String,
    #[serde(default)]
    pub urgency: Urgency,
    /// Reserve a specific equipment item for this request
    #[serde(default)]
    pub assigned_equipment_id: Option<String>,
}
