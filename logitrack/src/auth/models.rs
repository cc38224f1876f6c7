use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Permission {
    // Inventory
    ReadInventory,
    WriteInventory,

    // Orders and order summaries
    ReadOrders,
    WriteOrders,

    // Role administration
    ManageRoles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: HashSet<Permission>,
    pub is_system_role: bool,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(
        name: impl Into<String>,
        permissions: HashSet<Permission>,
        is_system_role: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            permissions,
            is_system_role,
            created_at: Utc::now(),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
        role_ids: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            password_hash,
            role_ids,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds `role_id` unless already present; returns whether it was added
    pub fn grant_role(&mut self, role_id: &str) -> bool {
        if self.role_ids.iter().any(|r| r == role_id) {
            return false;
        }
        self.role_ids.push(role_id.to_string());
        self.updated_at = Utc::now();
        true
    }
}
