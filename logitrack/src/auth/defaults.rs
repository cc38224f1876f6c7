use super::error::AuthError;
use super::models::{Permission, Role, User};
use super::password::hash_password;
use std::collections::HashSet;

pub const ADMIN_ROLE: &str = "Admin";
pub const MANAGER_ROLE: &str = "Manager";
pub const EMPLOYEE_ROLE: &str = "Employee";

/// The system roles every installation starts with
pub fn create_default_roles() -> Vec<Role> {
    vec![create_admin_role(), create_manager_role(), create_employee_role()]
}

pub fn create_admin_role() -> Role {
    let permissions = HashSet::from([
        Permission::ReadInventory,
        Permission::WriteInventory,
        Permission::ReadOrders,
        Permission::WriteOrders,
        Permission::ManageRoles,
    ]);
    Role::new(ADMIN_ROLE, permissions, true)
}

/// Managers may change inventory as well as orders
pub fn create_manager_role() -> Role {
    let permissions = HashSet::from([
        Permission::ReadInventory,
        Permission::WriteInventory,
        Permission::ReadOrders,
        Permission::WriteOrders,
    ]);
    Role::new(MANAGER_ROLE, permissions, true)
}

pub fn create_employee_role() -> Role {
    let permissions = HashSet::from([
        Permission::ReadInventory,
        Permission::ReadOrders,
        Permission::WriteOrders,
    ]);
    Role::new(EMPLOYEE_ROLE, permissions, true)
}

pub fn create_default_admin(
    username: &str,
    password: &str,
    admin_role_id: &str,
) -> Result<User, AuthError> {
    let password_hash = hash_password(password)?;
    Ok(User::new(
        username,
        format!("{}@localhost", username),
        password_hash,
        vec![admin_role_id.to_string()],
    ))
}
