use super::error::AuthError;
use super::models::{Role, User};
use super::repository::{RoleRepository, UserRepository};
use async_trait::async_trait;
use sled::Db;
use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};
use std::path::Path;

const USERS_TREE: &str = "users";
const USERS_BY_USERNAME_TREE: &str = "users_by_username";
const ROLES_TREE: &str = "roles";
const ROLES_BY_NAME_TREE: &str = "roles_by_name";

/// Open the identity database shared by the user and role repositories
pub fn open_identity_db<P: AsRef<Path>>(path: P) -> Result<Db, AuthError> {
    Ok(sled::open(path)?)
}

#[derive(Clone)]
pub struct SledUserRepository {
    db: Db,
}

impl SledUserRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    fn users_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(USERS_TREE)?)
    }

    fn users_by_username_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(USERS_BY_USERNAME_TREE)?)
    }
}

#[async_trait]
impl UserRepository for SledUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let users_tree = self.users_tree()?;
        let username_tree = self.users_by_username_tree()?;

        let encoded = serde_json::to_vec(&user)?;

        // The username index and the user record commit together
        let result: Result<(), TransactionError<AuthError>> = (&users_tree, &username_tree)
            .transaction(|(users, by_name)| {
                if by_name.get(user.username.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(
                        AuthError::UserAlreadyExists(user.username.clone()),
                    ));
                }
                by_name.insert(user.username.as_bytes(), user.id.as_bytes())?;
                users.insert(user.id.as_bytes(), encoded.as_slice())?;
                Ok(())
            });
        result.map_err(|err| match err {
            TransactionError::Abort(err) => err,
            TransactionError::Storage(err) => err.into(),
        })?;
        self.db.flush()?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let username_tree = self.users_by_username_tree()?;

        match username_tree.get(username.as_bytes())? {
            Some(user_id) => {
                let user_id = String::from_utf8_lossy(&user_id).into_owned();
                self.find_by_id(&user_id).await
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
        let users_tree = self.users_tree()?;

        match users_tree.get(id.as_bytes())? {
            Some(user_data) => Ok(Some(serde_json::from_slice(&user_data)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let users_tree = self.users_tree()?;

        if !users_tree.contains_key(user.id.as_bytes())? {
            return Err(AuthError::UserNotFound(user.username));
        }

        users_tree.insert(user.id.as_bytes(), serde_json::to_vec(&user)?)?;
        self.db.flush()?;

        Ok(user)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let username_tree = self.users_by_username_tree()?;
        Ok(username_tree.contains_key(username.as_bytes())?)
    }
}

#[derive(Clone)]
pub struct SledRoleRepository {
    db: Db,
}

impl SledRoleRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    fn roles_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(ROLES_TREE)?)
    }

    fn roles_by_name_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(ROLES_BY_NAME_TREE)?)
    }
}

#[async_trait]
impl RoleRepository for SledRoleRepository {
    async fn create(&self, role: Role) -> Result<Role, AuthError> {
        let roles_tree = self.roles_tree()?;
        let name_tree = self.roles_by_name_tree()?;

        // Role names are unique; an existing role with this name wins
        let claimed = name_tree.compare_and_swap(
            role.name.as_bytes(),
            None as Option<&[u8]>,
            Some(role.id.as_bytes()),
        )?;
        if claimed.is_err() {
            return self
                .find_by_name(&role.name)
                .await?
                .ok_or(AuthError::RoleNotFound(role.name));
        }

        roles_tree.insert(role.id.as_bytes(), serde_json::to_vec(&role)?)?;
        self.db.flush()?;

        Ok(role)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let name_tree = self.roles_by_name_tree()?;
        let roles_tree = self.roles_tree()?;

        if let Some(role_id) = name_tree.get(name.as_bytes())? {
            if let Some(role_data) = roles_tree.get(&role_id)? {
                return Ok(Some(serde_json::from_slice(&role_data)?));
            }
        }

        Ok(None)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Role>, AuthError> {
        let roles_tree = self.roles_tree()?;
        let mut roles = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some(role_data) = roles_tree.get(id.as_bytes())? {
                roles.push(serde_json::from_slice(&role_data)?);
            }
        }

        Ok(roles)
    }

    async fn list_all(&self) -> Result<Vec<Role>, AuthError> {
        let roles_tree = self.roles_tree()?;
        let mut roles = Vec::new();

        for item in roles_tree.iter() {
            let (_, role_data) = item?;
            roles.push(serde_json::from_slice(&role_data)?);
        }

        Ok(roles)
    }
}
