use super::defaults::{create_default_admin, EMPLOYEE_ROLE};
use super::error::AuthError;
use super::models::User;
use super::password::hash_password;
use super::repository::{RoleRepository, UserRepository};
use std::sync::Arc;
use tracing::info;

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, role_repo: Arc<dyn RoleRepository>) -> Self {
        Self {
            user_repo,
            role_repo,
        }
    }

    /// Register a new account holding the Employee role
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidRegistration("username is required".into()));
        }
        if !email.contains('@') {
            return Err(AuthError::InvalidRegistration(format!(
                "'{}' is not an email address",
                email
            )));
        }
        if self.user_repo.username_exists(username).await? {
            return Err(AuthError::UserAlreadyExists(username.to_string()));
        }

        let employee = self
            .role_repo
            .find_by_name(EMPLOYEE_ROLE)
            .await?
            .ok_or_else(|| AuthError::RoleNotFound(EMPLOYEE_ROLE.to_string()))?;

        let password_hash = hash_password(password)?;
        let user = User::new(username, email, password_hash, vec![employee.id]);
        self.user_repo.create(user).await
    }

    pub async fn get_user(&self, username: &str) -> Result<User, AuthError> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))
    }

    /// Create the configured admin account unless it already exists
    pub async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
        admin_role_id: &str,
    ) -> Result<bool, AuthError> {
        if self.user_repo.username_exists(username).await? {
            info!("Admin user already exists: {}", username);
            return Ok(false);
        }

        let admin = create_default_admin(username, password, admin_role_id)?;
        self.user_repo.create(admin).await?;
        info!("Default admin user created: {}", username);
        Ok(true)
    }
}
