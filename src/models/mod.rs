//! Data models for Assetflow

pub mod approval;
pub mod enums;
pub mod equipment;
pub mod history;
pub mod settings;
pub mod user;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use approval::{Approval, CreateApproval, ValidationStep};
pub use enums::{
    ApprovalStatus, AssignmentStatus, EquipmentStatus, EventType, Role, StepStatus, TargetType,
    Urgency, UserStatus,
};
pub use equipment::{CreateEquipment, Equipment, FinancialInfo, UpdateEquipment};
pub use history::{EventMetadata, HistoryEvent};
pub use settings::Settings;
pub use user::{CreateUser, UpdateUser, User};

/// The already-resolved acting user behind a mutating operation.
///
/// Identity verification happens outside the engine; every guarded
/// operation receives one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

impl From<&User> for Actor {
    fn from(u: &User) -> Self {
        Actor {
            id: u.id.clone(),
            name: u.name.clone(),
            role: u.role,
        }
    }
}

/// Uniform result of every guarded operation.
///
/// Business-rule denials are expected and frequent: they are values, not
/// errors, and always carry a human-readable reason suitable for direct
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }
}
