use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Permission denied: {0:?} required")]
    PermissionDenied(super::models::Permission),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Role '{0}' not found")]
    RoleNotFound(String),

    #[error("User '{0}' already exists")]
    UserAlreadyExists(String),

    #[error("Password does not meet strength requirements: {0}")]
    WeakPassword(&'static str),

    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    #[error("Session expired or unknown")]
    InvalidSession,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),
}

impl From<sled::Error> for AuthError {
    fn from(err: sled::Error) -> Self {
        AuthError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::SerializationError(err.to_string())
    }
}
