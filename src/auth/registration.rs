//! Account registration for msgdrop.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{validate_password, validate_username, ValidationError};
use crate::auth::{hash_password, PasswordError};
use crate::config::AuthConfig;
use crate::store::{Account, AccountRepository};
use crate::MsgdropError;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Account name already exists.
    #[error("account name already exists")]
    NameTaken,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Backing store error.
    #[error("store error: {0}")]
    Store(String),
}

/// Register a new account.
///
/// Validates the name and password against the configured thresholds,
/// rejects duplicate names, hashes the password, and creates the account
/// with a zeroed failure counter.
pub fn register(
    repo: &dyn AccountRepository,
    config: &AuthConfig,
    name: &str,
    password: &str,
) -> Result<Account, RegistrationError> {
    validate_username(name, config.min_username_len)?;
    validate_password(password, config.min_password_len)?;

    if repo
        .account_exists(name)
        .map_err(|e| RegistrationError::Store(e.to_string()))?
    {
        return Err(RegistrationError::NameTaken);
    }

    let password_hash = hash_password(password)?;

    let account = match repo.create_account(name, &password_hash) {
        Ok(account) => account,
        // Lost a race with a concurrent registration of the same name
        Err(MsgdropError::Conflict(_)) => return Err(RegistrationError::NameTaken),
        Err(e) => return Err(RegistrationError::Store(e.to_string())),
    };

    info!(account = %account.name, "account registered");
    Ok(account)
}
