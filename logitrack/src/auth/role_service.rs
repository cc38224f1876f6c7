use super::defaults::create_default_roles;
use super::error::AuthError;
use super::models::{Role, User};
use super::repository::{RoleRepository, UserRepository};
use std::sync::Arc;
use tracing::info;

pub struct RoleService {
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
}

impl RoleService {
    pub fn new(user_repo: Arc<dyn UserRepository>, role_repo: Arc<dyn RoleRepository>) -> Self {
        Self {
            user_repo,
            role_repo,
        }
    }

    /// Create the system roles that are missing; returns all of them
    pub async fn initialize_default_roles(&self) -> Result<Vec<Role>, AuthError> {
        let mut roles = Vec::new();
        for role in create_default_roles() {
            let role = match self.role_repo.find_by_name(&role.name).await? {
                Some(existing) => existing,
                None => self.role_repo.create(role).await?,
            };
            roles.push(role);
        }
        Ok(roles)
    }

    pub async fn get_role(&self, name: &str) -> Result<Role, AuthError> {
        self.role_repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| AuthError::RoleNotFound(name.to_string()))
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AuthError> {
        self.role_repo.list_all().await
    }

    /// Grant `role_name` to `username`. Granting a role the user already holds is a no-op.
    pub async fn assign_role(&self, username: &str, role_name: &str) -> Result<User, AuthError> {
        let role = self.get_role(role_name).await?;
        let mut user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        if !user.grant_role(&role.id) {
            return Ok(user);
        }

        info!("Granted role {} to {}", role.name, user.username);
        self.user_repo.update(user).await
    }
}
