//! Account and service persistence for msgdrop.
//!
//! This module defines the repository traits that the rest of the crate
//! programs against, plus the conforming backends. Any backend that can
//! answer these operations is equivalent: the in-memory map, the JSON
//! snapshot file, or a future relational store.
//!
//! All counter mutation (`record_login_failure`, `reset_login_failures`)
//! must be atomic per account: concurrent login attempts may never lose an
//! increment.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A registered account.
///
/// The password is stored only as an Argon2id PHC hash; the plaintext never
/// reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account name, immutable once created.
    pub name: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Consecutive failed login attempts. Reset to zero on success.
    pub failed_logins: u32,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A named service endpoint owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service name, unique across all accounts.
    pub name: String,
    /// Name of the owning account.
    pub owner: String,
    /// When the service was created.
    pub created_at: DateTime<Utc>,
}

/// Repository operations over accounts.
pub trait AccountRepository: Send + Sync {
    /// Create an account with `failed_logins = 0`.
    ///
    /// Fails with [`crate::MsgdropError::Conflict`] if the name is taken.
    fn create_account(&self, name: &str, password_hash: &str) -> Result<Account>;

    /// Look up an account by name. No side effects.
    fn find_account(&self, name: &str) -> Result<Option<Account>>;

    /// Check whether an account name is taken.
    fn account_exists(&self, name: &str) -> Result<bool>;

    /// Atomically increment the failed login counter, returning the new
    /// value. Fails with [`crate::MsgdropError::NotFound`] if the account
    /// does not exist.
    fn record_login_failure(&self, name: &str) -> Result<u32>;

    /// Atomically reset the failed login counter to zero.
    fn reset_login_failures(&self, name: &str) -> Result<()>;
}

/// Repository operations over services.
pub trait ServiceRepository: Send + Sync {
    /// Bind `name -> owner`. Fails with [`crate::MsgdropError::Conflict`]
    /// if the name is taken by any account.
    fn create_service(&self, name: &str, owner: &str) -> Result<Service>;

    /// Look up a service by name.
    fn find_service(&self, name: &str) -> Result<Option<Service>>;

    /// Check whether a service name is taken.
    fn service_exists(&self, name: &str) -> Result<bool>;

    /// Services owned by an account, in insertion order.
    fn services_by_owner(&self, owner: &str) -> Result<Vec<Service>>;

    /// All services, in insertion order. Used to rebuild mailbox slots at
    /// startup.
    fn all_services(&self) -> Result<Vec<Service>>;
}

/// Combined store trait for backends that hold both tables.
pub trait Store: AccountRepository + ServiceRepository {}

impl<T: AccountRepository + ServiceRepository> Store for T {}

/// Shared handle to a store backend.
pub type SharedStore = Arc<dyn Store>;

/// Snapshot of both tables, shared by the in-memory and JSON backends.
///
/// Services live in a `Vec` so that insertion order survives serialization;
/// lookups are linear, which is fine at the scale a single drop host serves.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Tables {
    pub(crate) accounts: std::collections::HashMap<String, Account>,
    pub(crate) services: Vec<Service>,
}
