use crate::api::UpdateInventoryRequest;
use crate::error::ApiError;
use crate::middleware::check_permission;
use crate::state::AppState;
use crate::validation::parse_id;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use logitrack::auth::{Permission, User};
use logitrack::InventoryItem;
use std::sync::Arc;
use tracing::info;

/// GET /inventory
pub async fn list_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Arc<Vec<InventoryItem>>>, ApiError> {
    check_permission(&state.auth_service, &user, Permission::ReadInventory).await?;
    Ok(Json(state.repository.get_all_inventory().await?))
}

/// GET /inventory/{id}
pub async fn get_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<InventoryItem>, ApiError> {
    check_permission(&state.auth_service, &user, Permission::ReadInventory).await?;
    let id = parse_id(&id, "inventory item")?;

    state
        .repository
        .get_inventory_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            shared::Error::not_found(format!("inventory item with id {} was not found", id)).into()
        })
}

/// POST /inventory
pub async fn create_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    body: Result<Json<InventoryItem>, JsonRejection>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    check_permission(&state.auth_service, &user, Permission::WriteInventory).await?;
    let Json(item) = body?;

    let item = state.repository.add_inventory(item).await?;
    info!(
        "ADD_INVENTORY: item={}, requested_by={}",
        item.display_info(),
        user.username
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /inventory/{id}
pub async fn update_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    body: Result<Json<UpdateInventoryRequest>, JsonRejection>,
) -> Result<Json<InventoryItem>, ApiError> {
    check_permission(&state.auth_service, &user, Permission::WriteInventory).await?;
    let id = parse_id(&id, "inventory item")?;
    let Json(req) = body?;

    let item = state.repository.update_inventory(req.into_item(id)).await?;
    info!(
        "UPDATE_INVENTORY: item={}, requested_by={}",
        item.display_info(),
        user.username
    );
    Ok(Json(item))
}

/// DELETE /inventory/{id}
pub async fn delete_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    check_permission(&state.auth_service, &user, Permission::WriteInventory).await?;
    let id = parse_id(&id, "inventory item")?;

    if !state.repository.delete_inventory(id).await? {
        return Err(
            shared::Error::not_found(format!("inventory item with id {} was not found", id))
                .into(),
        );
    }

    info!("DELETE_INVENTORY: id={}, requested_by={}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}
