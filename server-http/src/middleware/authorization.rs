use crate::error::ApiError;
use logitrack::auth::{AuthService, Permission, User};
use tracing::debug;

/// Helper function to check permissions in route handlers
pub async fn check_permission(
    auth_service: &AuthService,
    user: &User,
    permission: Permission,
) -> Result<(), ApiError> {
    auth_service.authorize(user, permission).await.map_err(|e| {
        debug!("{} denied {:?}", user.username, permission);
        ApiError::from(e)
    })
}
