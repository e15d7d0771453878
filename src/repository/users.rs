//! User domain methods on Repository

use uuid::Uuid;
use validator::Validate;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EventType, TargetType, UserStatus},
        Actor, Approval, CreateUser, Decision, Equipment, EventMetadata, HistoryEvent, UpdateUser,
        User,
    },
    services::authorization,
};

impl Repository {
    /// List all users in insertion order
    pub fn users(&self) -> Vec<&User> {
        self.users.values().collect()
    }

    /// Get a user by id
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Get a user by email
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    /// Create a user
    pub fn add_user(&mut self, actor: &Actor, data: CreateUser) -> AppResult<Decision> {
        data.validate()?;

        let id = data
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if self.users.contains_key(&id) {
            return Err(AppError::Conflict(format!("User {id} already exists")));
        }

        let users: Vec<&User> = self.users.values().collect();
        let decision = authorization::can_create_user(actor, &data, &users);
        if !decision.allowed {
            return Ok(self.log_denial(actor, TargetType::User, &id, &data.name, decision));
        }

        let user = User {
            id: id.clone(),
            name: data.name,
            email: data.email,
            role: data.role,
            department: data.department,
            manager_id: data.manager_id,
            status: UserStatus::Active,
        };
        let event = HistoryEvent::new(
            actor,
            EventType::Create,
            TargetType::User,
            id.as_str(),
            user.name.as_str(),
            format!("User {} ({}) added to the directory", user.name, user.role),
        );
        self.users.insert(id, user);
        self.persist_users();
        self.record_event(event);
        Ok(Decision::allow())
    }

    /// Update a user.
    ///
    /// Unknown ids fail fast; business rules come back as a denial.
    pub fn update_user(
        &mut self,
        actor: &Actor,
        id: &str,
        patch: UpdateUser,
    ) -> AppResult<Decision> {
        let target = self
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

        let approvals: Vec<&Approval> = self.approvals.values().collect();
        let decision = authorization::can_update_user(actor, &target, &patch, &approvals);
        if !decision.allowed {
            return Ok(self.log_denial(actor, TargetType::User, id, &target.name, decision));
        }

        let updated = patch.apply(&target);
        let mut metadata = EventMetadata::new();
        if target.role != updated.role {
            metadata.insert("from_role".into(), target.role.as_str().into());
            metadata.insert("to_role".into(), updated.role.as_str().into());
        }
        if target.department != updated.department {
            metadata.insert("from_department".into(), target.department.clone());
            metadata.insert("to_department".into(), updated.department.clone());
        }

        let event = HistoryEvent::new(
            actor,
            EventType::Update,
            TargetType::User,
            id,
            updated.name.as_str(),
            format!("User {} updated", updated.name),
        )
        .with_metadata(metadata);

        self.users.insert(id.to_string(), updated);
        self.persist_users();
        self.record_event(event);
        Ok(Decision::allow())
    }

    /// Delete a user
    pub fn delete_user(&mut self, actor: &Actor, id: &str) -> AppResult<Decision> {
        let target = self
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

        let users: Vec<&User> = self.users.values().collect();
        let equipment: Vec<&Equipment> = self.equipment.values().collect();
        let approvals: Vec<&Approval> = self.approvals.values().collect();
        let decision =
            authorization::can_delete_user(actor, &target, &users, &equipment, &approvals);
        if !decision.allowed {
            return Ok(self.log_denial(actor, TargetType::User, id, &target.name, decision));
        }

        let mut metadata = EventMetadata::new();
        metadata.insert("role".into(), target.role.as_str().into());
        metadata.insert("department".into(), target.department.clone());
        let event = HistoryEvent::new(
            actor,
            EventType::Delete,
            TargetType::User,
            id,
            target.name.as_str(),
            format!("User {} removed from the directory", target.name),
        )
        .with_metadata(metadata);

        self.users.shift_remove(id);
        self.persist_users();
        self.record_event(event);
        Ok(Decision::allow())
    }
}
