use crate::api::{AssignManagerRequest, UserResponse};
use crate::error::ApiError;
use crate::middleware::check_permission;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use logitrack::auth::defaults::MANAGER_ROLE;
use logitrack::auth::{Permission, User};
use tracing::info;

/// POST /admin/roles/assign-manager - Grant the Manager role to a user
pub async fn assign_manager(
    State(state): State<AppState>,
    Extension(current_user): Extension<User>,
    body: Result<Json<AssignManagerRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    check_permission(&state.auth_service, &current_user, Permission::ManageRoles).await?;
    let Json(req) = body?;

    info!(
        "ASSIGN_MANAGER: username={}, requested_by={}",
        req.username, current_user.username
    );

    let user = state
        .role_service
        .assign_role(&req.username, MANAGER_ROLE)
        .await?;
    Ok(Json(user.into()))
}
