use crate::api::CreateOrderRequest;
use crate::error::ApiError;
use crate::middleware::check_permission;
use crate::state::AppState;
use crate::validation::{parse_id, validate_create_order_request};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use logitrack::auth::{Permission, User};
use logitrack::{Order, OrderView};
use tracing::info;

/// GET /orders
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    check_permission(&state.auth_service, &user, Permission::ReadOrders).await?;
    Ok(Json(state.repository.get_all_orders().await?))
}

/// GET /orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, ApiError> {
    check_permission(&state.auth_service, &user, Permission::ReadOrders).await?;
    let id = parse_id(&id, "order")?;

    state
        .repository
        .get_order_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| shared::Error::not_found(format!("order with id {} was not found", id)).into())
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    check_permission(&state.auth_service, &user, Permission::WriteOrders).await?;
    let Json(req) = body?;
    validate_create_order_request(&req)?;

    let order = state.repository.add_order(req.into()).await?;
    info!("CREATE_ORDER: {}, requested_by={}", order.summary_line(), user.username);
    Ok((StatusCode::CREATED, Json(order)))
}

/// DELETE /orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    check_permission(&state.auth_service, &user, Permission::WriteOrders).await?;
    let id = parse_id(&id, "order")?;

    if !state.repository.delete_order(id).await? {
        return Err(shared::Error::not_found(format!("order with id {} was not found", id)).into());
    }

    info!("DELETE_ORDER: id={}, requested_by={}", id, user.username);
    Ok(StatusCode::NO_CONTENT)
}
