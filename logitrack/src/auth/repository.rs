use super::error::AuthError;
use super::models::{Role, User};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; fails when the username is taken
    async fn create(&self, user: User) -> Result<User, AuthError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError>;

    /// Replace a stored user
    async fn update(&self, user: User) -> Result<User, AuthError>;

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn create(&self, role: Role) -> Result<Role, AuthError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthError>;

    /// Unknown ids are skipped
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Role>, AuthError>;

    async fn list_all(&self) -> Result<Vec<Role>, AuthError>;
}
