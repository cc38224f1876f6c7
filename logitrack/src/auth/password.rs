use argon2::password_hash::rand_core::OsRng;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::error::AuthError;

const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password with Argon2 after checking it against the strength rules
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    validate_password_strength(password)?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHashError(e.to_string()))
}

/// Verify a password against a stored PHC hash string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::PasswordHashError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// At least eight characters, with a letter and a digit
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword("must be at least 8 characters"));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(AuthError::WeakPassword("must contain a letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword("must contain a digit"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("warehouse42").unwrap();

        assert!(verify_password("warehouse42", &hash).unwrap());
        assert!(!verify_password("warehouse43", &hash).unwrap());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password_strength("admin123").is_ok());
        assert!(matches!(
            validate_password_strength("ab1"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password_strength("onlyletters").is_err());
        assert!(validate_password_strength("12345678").is_err());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("admin123", "not-a-phc-string"),
            Err(AuthError::PasswordHashError(_))
        ));
    }
}
