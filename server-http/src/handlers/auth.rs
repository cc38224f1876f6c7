use crate::api::{
    LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, UserResponse,
};
use crate::error::ApiError;
use crate::middleware::authentication::{extract_basic_auth, extract_bearer_token};
use crate::state::AppState;
use crate::validation::validate_register_request;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use tracing::info;

/// POST /auth/register
///
/// Creates an account holding the Employee role.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(req) = body?;
    validate_register_request(&req)?;

    let user = state
        .user_service
        .register(&req.username, &req.email, &req.password)
        .await?;

    info!("REGISTER: username={}", user.username);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login
///
/// Accepts either a JSON body `{"username", "password"}` or a Basic Auth
/// header and returns a bearer token for subsequent calls.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (username, password) = match body {
        Ok(Json(req)) => (req.username, req.password),
        Err(_) => headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_basic_auth)
            .ok_or_else(|| {
                ApiError::bad_request(
                    "Missing credentials. Provide either JSON body or Basic Auth header",
                )
            })?,
    };

    let client_ip = headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string());

    let user = state.auth_service.authenticate(&username, &password).await?;
    let session = state.session_store.create_session(user, client_ip).await;

    info!(
        "LOGIN: username={}, client_ip={}",
        session.user.username,
        session.client_ip.as_deref().unwrap_or("-")
    );
    Ok(Json(LoginResponse {
        token: session.token,
        expires_in: state.session_store.ttl().as_secs(),
        expires_at: session.expires_at,
        username: session.user.username,
    }))
}

/// POST /auth/logout
///
/// Invalidates the bearer token from the Authorization header.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or(ApiError::Unauthorized("Expected Authorization: Bearer <token>"))?;

    if !state.session_store.invalidate(&token).await {
        return Err(shared::Error::not_found("session not found or already expired").into());
    }

    Ok(Json(LogoutResponse {
        message: "Session logged out successfully".to_string(),
    }))
}
