//! Input validation for account and service names.
//!
//! Minimum lengths are configuration, not constants: the variants this
//! design descends from disagree on the thresholds, so they arrive as
//! arguments from [`crate::config::AuthConfig`]. Upper bounds and charsets
//! are fixed.

use thiserror::Error;

/// Maximum account name length.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum service name length.
pub const MAX_SERVICE_NAME_LENGTH: usize = 64;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account name is shorter than the configured minimum.
    #[error("username must be at least {0} characters")]
    UsernameTooShort(usize),

    /// Account name is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Account name contains characters outside the allowed set.
    #[error("username can only contain letters, digits, and underscores")]
    UsernameInvalidChars,

    /// Password is shorter than the configured minimum.
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Password has no digit.
    #[error("password must contain at least one digit")]
    PasswordNeedsDigit,

    /// Service name is empty.
    #[error("service name cannot be empty")]
    ServiceNameEmpty,

    /// Service name is too long.
    #[error("service name must be at most {MAX_SERVICE_NAME_LENGTH} characters")]
    ServiceNameTooLong,

    /// Service name contains characters outside the allowed set.
    #[error("service name can only contain letters, digits, hyphens, and underscores")]
    ServiceNameInvalidChars,
}

/// Validate an account name against the configured minimum length.
pub fn validate_username(name: &str, min_len: usize) -> Result<(), ValidationError> {
    if name.chars().count() < min_len {
        return Err(ValidationError::UsernameTooShort(min_len));
    }
    if name.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate a password: configured minimum length plus at least one digit.
pub fn validate_password(password: &str, min_len: usize) -> Result<(), ValidationError> {
    if password.chars().count() < min_len {
        return Err(ValidationError::PasswordTooShort(min_len));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordNeedsDigit);
    }
    Ok(())
}

/// Validate a service name: letters, digits, hyphen, underscore.
pub fn validate_service_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::ServiceNameEmpty);
    }
    if name.chars().count() > MAX_SERVICE_NAME_LENGTH {
        return Err(ValidationError::ServiceNameTooLong);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::ServiceNameInvalidChars);
    }
    Ok(())
}
