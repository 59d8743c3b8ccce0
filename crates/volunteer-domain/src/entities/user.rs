//! Actors and user summaries

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Role code the backing API uses for administrators
pub const ADMIN_ROLE_CODE: i64 = 0;

/// Single source of truth for the admin check.
///
/// The API reports privilege either as a numeric `role` or a `user_type`
/// string; either one is sufficient.
pub fn is_admin_role(role: Option<i64>, user_type: Option<&str>) -> bool {
    role == Some(ADMIN_ROLE_CODE)
        || user_type.is_some_and(|t| t.trim().eq_ignore_ascii_case("admin"))
}

/// The viewer performing an action. Request-scoped, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    is_admin: bool,
}

impl Actor {
    /// Build an actor from the raw role fields, normalizing privilege once
    pub fn new(id: UserId, role: Option<i64>, user_type: Option<&str>) -> Self {
        Self {
            id,
            is_admin: is_admin_role(role, user_type),
        }
    }

    pub fn admin(id: UserId) -> Self {
        Self { id, is_admin: true }
    }

    pub fn member(id: UserId) -> Self {
        Self {
            id,
            is_admin: false,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// User as listed in assignment pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub is_admin: bool,
}
