use super::error::AuthError;
use super::models::{Permission, User};
use super::password::verify_password;
use super::repository::{RoleRepository, UserRepository};
use std::collections::HashSet;
use std::sync::Arc;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, role_repo: Arc<dyn RoleRepository>) -> Self {
        Self {
            user_repo,
            role_repo,
        }
    }

    /// Authenticate a user by username and password
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Union of the permissions granted by all of the user's roles
    pub async fn permissions_of(&self, user: &User) -> Result<HashSet<Permission>, AuthError> {
        let roles = self.role_repo.find_by_ids(&user.role_ids).await?;
        Ok(roles
            .into_iter()
            .flat_map(|role| role.permissions)
            .collect())
    }

    /// Check if a user has a specific permission
    pub async fn authorize(&self, user: &User, permission: Permission) -> Result<(), AuthError> {
        if self.permissions_of(user).await?.contains(&permission) {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied(permission))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::defaults::{create_employee_role, create_manager_role};
    use crate::auth::password::hash_password;
    use crate::auth::sled_repository::{open_identity_db, SledRoleRepository, SledUserRepository};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        service: AuthService,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let db = open_identity_db(dir.path().join("identity.sled")).unwrap();
        let users = Arc::new(SledUserRepository::new(db.clone())) as Arc<dyn UserRepository>;
        let roles = Arc::new(SledRoleRepository::new(db)) as Arc<dyn RoleRepository>;
        let service = AuthService::new(users.clone(), roles.clone());
        Fixture {
            _dir: dir,
            users,
            roles,
            service,
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let f = fixture();
        let hash = hash_password("warehouse42").unwrap();
        f.users
            .create(User::new("samir", "samir@example.com", hash, vec![]))
            .await
            .unwrap();

        assert!(f.service.authenticate("samir", "warehouse42").await.is_ok());
        assert!(matches!(
            f.service.authenticate("samir", "wrongpass1").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            f.service.authenticate("nobody", "warehouse42").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authorize_by_role() {
        let f = fixture();
        let employee = f.roles.create(create_employee_role()).await.unwrap();
        let manager = f.roles.create(create_manager_role()).await.unwrap();

        let clerk = User::new("clerk", "clerk@example.com", "h".into(), vec![employee.id]);
        assert!(f.service.authorize(&clerk, Permission::ReadInventory).await.is_ok());
        assert!(matches!(
            f.service.authorize(&clerk, Permission::WriteInventory).await,
            Err(AuthError::PermissionDenied(Permission::WriteInventory))
        ));

        let boss = User::new("boss", "boss@example.com", "h".into(), vec![manager.id]);
        assert!(f.service.authorize(&boss, Permission::WriteInventory).await.is_ok());
    }
}
