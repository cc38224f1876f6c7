pub mod authentication;
pub mod authorization;

pub use authentication::auth_middleware;
pub use authorization::check_permission;
