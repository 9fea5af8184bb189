//! Login throttle gate with CAPTCHA escalation.
//!
//! Each account moves through a two-state machine keyed by its persistent
//! `failed_logins` counter:
//!
//! - Normal: `failed_logins < threshold`. Attempts go straight to the
//!   password check.
//! - CaptchaRequired: `failed_logins >= threshold`. A verified CAPTCHA
//!   token is a precondition; without one the password is never compared.
//!
//! A failed or missing CAPTCHA check is not a login attempt: it does not
//! touch the counter. Only a password mismatch increments it, and a match
//! resets it to zero. Both mutations are single atomic store operations, so
//! concurrent attempts against one account cannot lose an increment.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::verify_password;
use crate::captcha::CaptchaVerifier;
use crate::store::{Account, AccountRepository};

/// Default escalation threshold.
pub const DEFAULT_CAPTCHA_THRESHOLD: u32 = 3;

/// Login errors.
///
/// `UnknownAccount` and `BadPassword` render identically so callers cannot
/// tell which half of the credential was wrong; the variants stay distinct
/// for internal logging.
#[derive(Error, Debug)]
pub enum LoginError {
    /// No account with that name.
    #[error("invalid username or password")]
    UnknownAccount,

    /// Password did not match.
    #[error("invalid username or password")]
    BadPassword,

    /// The attempt needs a CAPTCHA token and none was supplied.
    #[error("captcha required")]
    CaptchaRequired,

    /// The supplied CAPTCHA token failed verification.
    #[error("captcha verification failed")]
    CaptchaInvalid,

    /// Backing store error.
    #[error("store error: {0}")]
    Store(String),
}

/// The throttle gate wrapping credential checks.
pub struct LoginGate {
    threshold: u32,
    verifier: Arc<dyn CaptchaVerifier>,
}

impl LoginGate {
    /// Create a gate with the given escalation threshold and verifier.
    pub fn new(threshold: u32, verifier: Arc<dyn CaptchaVerifier>) -> Self {
        Self {
            threshold,
            verifier,
        }
    }

    /// Whether an account currently requires a CAPTCHA token to attempt a
    /// login. Unknown accounts report `false`.
    pub fn captcha_required(
        &self,
        accounts: &dyn AccountRepository,
        name: &str,
    ) -> Result<bool, LoginError> {
        let account = accounts
            .find_account(name)
            .map_err(|e| LoginError::Store(e.to_string()))?;
        Ok(account.is_some_and(|a| a.failed_logins >= self.threshold))
    }

    /// Attempt a login.
    ///
    /// On success the failure counter is reset and the account returned; on
    /// a password mismatch the counter is incremented. CAPTCHA failures
    /// leave the counter untouched.
    pub async fn attempt_login(
        &self,
        accounts: &dyn AccountRepository,
        name: &str,
        password: &str,
        captcha_token: Option<&str>,
    ) -> Result<Account, LoginError> {
        let account = accounts
            .find_account(name)
            .map_err(|e| LoginError::Store(e.to_string()))?
            .ok_or_else(|| {
                debug!(account = %name, "login failed: unknown account");
                LoginError::UnknownAccount
            })?;

        if account.failed_logins >= self.threshold {
            let token = captcha_token
                .filter(|t| !t.is_empty())
                .ok_or(LoginError::CaptchaRequired)?;

            if !self.verifier.verify(token).await {
                warn!(account = %name, "login blocked: captcha verification failed");
                return Err(LoginError::CaptchaInvalid);
            }
        }

        match verify_password(password, &account.password_hash) {
            Ok(()) => {
                accounts
                    .reset_login_failures(name)
                    .map_err(|e| LoginError::Store(e.to_string()))?;
                info!(account = %name, "login successful");
                Ok(Account {
                    failed_logins: 0,
                    ..account
                })
            }
            Err(_) => {
                let failures = accounts
                    .record_login_failure(name)
                    .map_err(|e| LoginError::Store(e.to_string()))?;
                warn!(account = %name, failures, "login failed: bad password");
                Err(LoginError::BadPassword)
            }
        }
    }
}
