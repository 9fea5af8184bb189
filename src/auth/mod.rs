//! Authentication module for msgdrop.
//!
//! Password hashing, input validation, registration, bearer sessions, and
//! the login throttle gate.

mod password;
mod registration;
mod session;
mod throttle;
pub mod validation;

pub use password::{hash_password, verify_password, PasswordError};
pub use registration::{register, RegistrationError};
pub use session::{Session, SessionManager, DEFAULT_SESSION_TTL_SECS};
pub use throttle::{LoginError, LoginGate, DEFAULT_CAPTCHA_THRESHOLD};
pub use validation::ValidationError;
