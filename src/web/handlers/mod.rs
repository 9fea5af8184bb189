//! Request handlers for the msgdrop API.

mod auth;
mod link;
mod service;

pub use auth::{captcha_check, login, register};
pub use link::getmsg;
pub use service::{create_service, list_services, send_message};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::{LoginGate, SessionManager};
use crate::captcha::CaptchaVerifier;
use crate::config::{AuthConfig, Config};
use crate::mailbox::MailboxStore;
use crate::store::SharedStore;
use crate::web::error::ApiError;
use crate::Result;

/// Application state shared across handlers.
pub struct AppState {
    /// Account and service store.
    pub store: SharedStore,
    /// Per-service mailbox slots.
    pub mailboxes: Arc<MailboxStore>,
    /// Issued bearer sessions.
    pub sessions: Arc<SessionManager>,
    /// Login throttle gate.
    pub gate: LoginGate,
    /// Account validation thresholds.
    pub auth: AuthConfig,
    /// Long-poll upper bound.
    pub max_wait: Duration,
}

impl AppState {
    /// Build the application state, rebuilding a mailbox slot for every
    /// service already in the store.
    pub fn new(
        config: &Config,
        store: SharedStore,
        verifier: Arc<dyn CaptchaVerifier>,
    ) -> Result<Self> {
        let mailboxes = Arc::new(MailboxStore::new(config.poll.interval()));
        for service in store.all_services()? {
            mailboxes.register(&service.name);
        }

        Ok(Self {
            store,
            mailboxes,
            sessions: Arc::new(SessionManager::new(Duration::from_secs(
                config.auth.session_ttl_secs,
            ))),
            gate: LoginGate::new(config.auth.captcha_threshold, verifier),
            auth: config.auth.clone(),
            max_wait: config.poll.max_wait(),
        })
    }
}

/// Extractor for the account behind a bearer session token.
///
/// Rejects with 401 when the Authorization header is missing, malformed, or
/// names an expired session.
#[derive(Debug, Clone)]
pub struct AuthAccount(pub String);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

        let account = state
            .sessions
            .resolve(token)
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

        Ok(AuthAccount(account))
    }
}
