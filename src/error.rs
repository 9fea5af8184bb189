//! Error types for msgdrop.

use thiserror::Error;

/// Common error type for msgdrop.
#[derive(Error, Debug)]
pub enum MsgdropError {
    /// Validation error for user input (account name, password, service name).
    #[error("validation error: {0}")]
    Validation(String),

    /// A name (account or service) is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authentication error. The message is the same for an unknown account
    /// and a wrong password so callers cannot enumerate accounts.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The login throttle requires a CAPTCHA token for this attempt.
    #[error("captcha required")]
    CaptchaRequired,

    /// The supplied CAPTCHA token failed verification.
    #[error("captcha verification failed")]
    CaptchaInvalid,

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Backing store error.
    #[error("store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for msgdrop operations.
pub type Result<T> = std::result::Result<T, MsgdropError>;
