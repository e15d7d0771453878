//! Shared domain enums (wire-compatible with the original dataset)
//!
//! Statuses are persisted as the display strings the original dataset used
//! (French physical statuses, SCREAMING_SNAKE assignment statuses), so the
//! serde renames below are part of the storage contract.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User roles, ordered by authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    Manager,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Authority rank: SuperAdmin > Admin > Manager > User
    pub fn rank(&self) -> u8 {
        match self {
            Role::User => 0,
            Role::Manager => 1,
            Role::Admin => 2,
            Role::SuperAdmin => 3,
        }
    }

    /// Whether this role may administer the directory (create users, etc.)
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
            Role::SuperAdmin => "SuperAdmin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserStatus
// ---------------------------------------------------------------------------

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Physical condition of an equipment item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentStatus {
    #[serde(rename = "Disponible")]
    Available,
    #[serde(rename = "Attribué")]
    Assigned,
    #[serde(rename = "En réparation")]
    UnderRepair,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "Disponible",
            EquipmentStatus::Assigned => "Attribué",
            EquipmentStatus::UnderRepair => "En réparation",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AssignmentStatus
// ---------------------------------------------------------------------------

/// Custody workflow state of an equipment item, distinct from its
/// physical condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    None,
    WaitingManagerApproval,
    WaitingItProcessing,
    WaitingDotationApproval,
    PendingDelivery,
    Confirmed,
    Disputed,
    PendingReturn,
}

impl AssignmentStatus {
    /// True for every state that requires a current holder.
    /// Invariant: `equipment.user` is non-null iff `in_custody()`.
    pub fn in_custody(&self) -> bool {
        !matches!(self, AssignmentStatus::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::None => "NONE",
            AssignmentStatus::WaitingManagerApproval => "WAITING_MANAGER_APPROVAL",
            AssignmentStatus::WaitingItProcessing => "WAITING_IT_PROCESSING",
            AssignmentStatus::WaitingDotationApproval => "WAITING_DOTATION_APPROVAL",
            AssignmentStatus::PendingDelivery => "PENDING_DELIVERY",
            AssignmentStatus::Confirmed => "CONFIRMED",
            AssignmentStatus::Disputed => "DISPUTED",
            AssignmentStatus::PendingReturn => "PENDING_RETURN",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApprovalStatus
// ---------------------------------------------------------------------------

/// Status of an approval request along its fixed validation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalStatus {
    #[serde(rename = "WAITING_MANAGER_APPROVAL")]
    WaitingManagerApproval,
    #[serde(rename = "WAITING_IT_PROCESSING")]
    WaitingItProcessing,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Terminal statuses have no successors
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApprovalStatus::Approved | ApprovalStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::WaitingManagerApproval => "WAITING_MANAGER_APPROVAL",
            ApprovalStatus::WaitingItProcessing => "WAITING_IT_PROCESSING",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StepStatus
// ---------------------------------------------------------------------------

/// Outcome of one validation step in an approval's sign-off sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Pending,
    Validated,
    Rejected,
}

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// Urgency declared on an approval request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Normal,
    High,
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Normal
    }
}

// ---------------------------------------------------------------------------
// TargetType
// ---------------------------------------------------------------------------

/// Kind of entity a history event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    User,
    Equipment,
    Approval,
    System,
}

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Semantic classification of a history event.
///
/// Exactly one of these is emitted per mutation; the lifecycle service
/// owns the classification rules for equipment diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Create,
    Update,
    Delete,
    AssignPending,
    AssignManagerWait,
    AssignItProcessing,
    AssignDotationWait,
    AssignConfirmed,
    AssignDisputed,
    Return,
    RepairStart,
    RepairEnd,
    ApprovalCreated,
    ApprovalStepValidated,
    ApprovalApproved,
    ApprovalRejected,
    AccessDenied,
    SystemNotice,
}

impl EventType {
    /// Human title used as the timeline entry heading (and therefore as
    /// half of the reconciliation dedup key)
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Create => "Created",
            EventType::Update => "Updated",
            EventType::Delete => "Deleted",
            EventType::AssignPending => "Assignment pending delivery",
            EventType::AssignManagerWait => "Awaiting manager approval",
            EventType::AssignItProcessing => "IT processing",
            EventType::AssignDotationWait => "Awaiting dotation approval",
            EventType::AssignConfirmed => "Assignment confirmed",
            EventType::AssignDisputed => "Assignment disputed",
            EventType::Return => "Returned",
            EventType::RepairStart => "Repair started",
            EventType::RepairEnd => "Repair completed",
            EventType::ApprovalCreated => "Approval request created",
            EventType::ApprovalStepValidated => "Validation step passed",
            EventType::ApprovalApproved => "Request approved",
            EventType::ApprovalRejected => "Request rejected",
            EventType::AccessDenied => "Operation denied",
            EventType::SystemNotice => "System notice",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ranks_are_strictly_ordered() {
        assert!(Role::SuperAdmin.rank() > Role::Admin.rank());
        assert!(Role::Admin.rank() > Role::Manager.rank());
        assert!(Role::Manager.rank() > Role::User.rank());
    }

    #[test]
    fn status_wire_strings_match_original_dataset() {
        let s = serde_json::to_string(&EquipmentStatus::UnderRepair).unwrap();
        assert_eq!(s, "\"En réparation\"");
        let s = serde_json::to_string(&AssignmentStatus::WaitingManagerApproval).unwrap();
        assert_eq!(s, "\"WAITING_MANAGER_APPROVAL\"");
        let s = serde_json::to_string(&ApprovalStatus::Approved).unwrap();
        assert_eq!(s, "\"Approved\"");
    }

    #[test]
    fn only_none_is_out_of_custody() {
        assert!(!AssignmentStatus::None.in_custody());
        assert!(AssignmentStatus::PendingReturn.in_custody());
        assert!(AssignmentStatus::Confirmed.in_custody());
    }
}
