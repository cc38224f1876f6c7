use crate::error::ApiError;
use crate::middleware::check_permission;
use crate::state::AppState;
use crate::validation::parse_id;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use logitrack::auth::{Permission, User};
use logitrack::OrderSummary;
use std::sync::Arc;

/// GET /inventory/OrderSummary
pub async fn list_order_summaries(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Arc<Vec<OrderSummary>>>, ApiError> {
    check_permission(&state.auth_service, &user, Permission::ReadOrders).await?;
    Ok(Json(state.repository.get_all_order_summaries().await?))
}

/// GET /inventory/OrderSummary/{id}
///
/// Always read fresh from the store.
pub async fn get_order_summary(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<OrderSummary>, ApiError> {
    check_permission(&state.auth_service, &user, Permission::ReadOrders).await?;
    let id = parse_id(&id, "order")?;

    state
        .repository
        .get_order_summary(id)
        .await?
        .map(Json)
        .ok_or_else(|| shared::Error::not_found(format!("order with id {} was not found", id)).into())
}
