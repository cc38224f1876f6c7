use crate::api::ErrorResponse;
use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use logitrack::auth::AuthError;
use tracing::error;

/// Error returned by handlers and middleware; renders as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    Domain(shared::Error),
    Auth(AuthError),
    BadRequest(String),
    Unauthorized(&'static str),
}

impl From<shared::Error> for ApiError {
    fn from(err: shared::Error) -> Self {
        ApiError::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

/// Malformed or incomplete JSON bodies are client errors like any other
/// validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(err) => match err {
                shared::Error::NotFound(_) => StatusCode::NOT_FOUND,
                shared::Error::Conflict(_) => StatusCode::CONFLICT,
                shared::Error::Validation(_) => StatusCode::BAD_REQUEST,
                shared::Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidSession => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                AuthError::UserNotFound(_) | AuthError::RoleNotFound(_) => StatusCode::NOT_FOUND,
                AuthError::UserAlreadyExists(_) => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidRegistration(_) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::StorageError(_)
                | AuthError::SerializationError(_)
                | AuthError::PasswordHashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Domain(err) => err.to_string(),
            ApiError::Auth(err) => err.to_string(),
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Unauthorized(message) => (*message).to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!("Request failed: {}", message);
        }

        let body = Json(ErrorResponse::new(message));
        if status == StatusCode::UNAUTHORIZED {
            (
                status,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"LogiTrack\"")],
                body,
            )
                .into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// Failures while wiring up the server
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] shared::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}
