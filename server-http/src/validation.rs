use crate::api::{CreateOrderRequest, RegisterRequest};
use crate::error::ApiError;

const MAX_USERNAME_LEN: usize = 64;
const MAX_ORDER_LINES: usize = 500;

#[derive(Debug)]
pub enum ValidationError {
    InvalidId { resource: &'static str, raw: String },
    MissingRequiredField { field: &'static str },
    TooLong { field: &'static str, max: usize },
    TooManyLines { order_id: u32, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidId { resource, raw } => {
                write!(f, "'{}' is not a valid {} id", raw, resource)
            }
            ValidationError::MissingRequiredField { field } => {
                write!(f, "Missing required field '{}'", field)
            }
            ValidationError::TooLong { field, max } => {
                write!(f, "Field '{}' is longer than {} characters", field, max)
            }
            ValidationError::TooManyLines { order_id, max } => {
                write!(f, "Order {} has more than {} lines", order_id, max)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// Parse a numeric path segment
pub fn parse_id(raw: &str, resource: &'static str) -> Result<u32, ValidationError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidId {
            resource,
            raw: raw.to_string(),
        })
}

pub fn validate_register_request(req: &RegisterRequest) -> Result<(), ValidationError> {
    if req.username.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField { field: "username" });
    }
    if req.username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username",
            max: MAX_USERNAME_LEN,
        });
    }
    if req.email.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField { field: "email" });
    }
    Ok(())
}

pub fn validate_create_order_request(req: &CreateOrderRequest) -> Result<(), ValidationError> {
    if req.items.len() > MAX_ORDER_LINES {
        return Err(ValidationError::TooManyLines {
            order_id: req.order_id,
            max: MAX_ORDER_LINES,
        });
    }
    Ok(())
}
