//! User model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::{Role, UserStatus};

/// User record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: String,
    /// Direct manager (weak reference), used to route approval requests
    #[serde(default)]
    pub manager_id: Option<String>,
    pub status: UserStatus,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// Caller-supplied id (import pipelines); generated when absent
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub role: Role,
    #[validate(length(min = 1, message = "department must not be empty"))]
    pub department: String,
    pub manager_id: Option<String>,
}

/// Update user request (patch, absent fields are left untouched)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    /// `Some(None)` clears the manager reference
    #[serde(default)]
    pub manager_id: Option<Option<String>>,
    pub status: Option<UserStatus>,
}

impl UpdateUser {
    /// Whether the patch touches role or department, the two fields the
    /// guard freezes while a manager validation is in flight
    pub fn changes_routing(&self, current: &User) -> bool {
        self.role.map_or(false, |r| r != current.role)
            || self
                .department
                .as_ref()
                .map_or(false, |d| d != &current.department)
    }

    /// Apply the patch to a copy of `current` and return the new record
    pub fn apply(&self, current: &User) -> User {
        let mut next = current.clone();
        if let Some(ref v) = self.name {
            next.name = v.clone();
        }
        if let Some(ref v) = self.email {
            next.email = v.clone();
        }
        if let Some(v) = self.role {
            next.role = v;
        }
        if let Some(ref v) = self.department {
            next.department = v.clone();
        }
        if let Some(ref v) = self.manager_id {
            next.manager_id = v.clone();
        }
        if let Some(v) = self.status {
            next.status = v;
        }
        next
    }
}
