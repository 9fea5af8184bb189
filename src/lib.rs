//! msgdrop - single-slot message drop service.
//!
//! A registered account exposes named service endpoints; each service owns
//! a one-message mailbox that a remote client consumes through a bounded
//! long-poll, exactly once. Logins are throttled with CAPTCHA escalation
//! after repeated failures.

pub mod auth;
pub mod captcha;
pub mod config;
pub mod error;
pub mod logging;
pub mod mailbox;
pub mod store;
pub mod web;

pub use auth::{
    hash_password, register, verify_password, LoginError, LoginGate, PasswordError,
    RegistrationError, Session, SessionManager, ValidationError,
};
pub use captcha::{CaptchaVerifier, RecaptchaVerifier, StaticVerifier};
pub use config::Config;
pub use error::{MsgdropError, Result};
pub use mailbox::MailboxStore;
pub use store::{
    Account, AccountRepository, JsonStore, MemoryStore, Service, ServiceRepository, SharedStore,
    Store,
};
pub use web::WebServer;
