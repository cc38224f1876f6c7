use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use logitrack::auth::AuthError;

/// Credentials carried by an `Authorization` header
#[derive(Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Basic { username: String, password: String },
}

/// Extract Basic Auth credentials from Authorization header
pub fn extract_basic_auth(auth_header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = auth_header.trim().split_once(' ')?;
    if scheme != "Basic" {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    // passwords may contain ':'
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme != "Bearer" || token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

pub fn parse_credentials(auth_header: &str) -> Option<Credentials> {
    if let Some(token) = extract_bearer_token(auth_header) {
        return Some(Credentials::Bearer(token));
    }
    extract_basic_auth(auth_header)
        .map(|(username, password)| Credentials::Basic { username, password })
}

/// Resolve the caller from a session token or Basic credentials and attach
/// the `User` to the request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthorized("Missing Authorization header"))?;

    let credentials = parse_credentials(auth_header)
        .ok_or(ApiError::Unauthorized("Invalid Authorization header format"))?;

    let user = match credentials {
        Credentials::Bearer(token) => {
            let session_user = state.session_store.validate(&token).await?;
            // roles may have changed since login
            match state.user_service.get_user(&session_user.username).await {
                Ok(user) => user,
                Err(AuthError::UserNotFound(_)) => return Err(AuthError::InvalidSession.into()),
                Err(e) => return Err(e.into()),
            }
        }
        Credentials::Basic { username, password } => {
            state.auth_service.authenticate(&username, &password).await?
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
