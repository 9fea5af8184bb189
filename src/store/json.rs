//! JSON snapshot store backend.
//!
//! Holds the same in-memory tables as [`super::MemoryStore`] and mirrors
//! them to a JSON file after every mutation. In-memory state mutates first;
//! the flush is best-effort, so a failed write is logged and never surfaced
//! to the caller (and never un-does a mutation other readers may already
//! have observed).

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use tracing::warn;

use super::{Account, AccountRepository, Service, ServiceRepository, Tables};
use crate::{MsgdropError, Result};

/// Store backed by a JSON snapshot file.
#[derive(Debug)]
pub struct JsonStore {
    inner: RwLock<Tables>,
    path: PathBuf,
}

impl JsonStore {
    /// Open a store at the given path, loading an existing snapshot if one
    /// is present.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| MsgdropError::Store(format!("corrupt snapshot: {e}")))?
        } else {
            Tables::default()
        };

        Ok(Self {
            inner: RwLock::new(tables),
            path,
        })
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| MsgdropError::Store("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| MsgdropError::Store("store lock poisoned".to_string()))
    }

    /// Mirror the current tables to disk. Best-effort.
    fn flush(&self, snapshot: &Tables) {
        let result = serde_json::to_string_pretty(snapshot)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&self.path, json)
            });

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "failed to flush store snapshot");
        }
    }

    /// Run a mutation under the write lock, then mirror to disk.
    fn mutate<T>(&self, op: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let snapshot;
        let value;
        {
            let mut tables = self.write()?;
            value = op(&mut tables)?;
            snapshot = tables.clone();
        }
        self.flush(&snapshot);
        Ok(value)
    }
}

impl AccountRepository for JsonStore {
    fn create_account(&self, name: &str, password_hash: &str) -> Result<Account> {
        self.mutate(|tables| {
            if tables.accounts.contains_key(name) {
                return Err(MsgdropError::Conflict(format!(
                    "account '{name}' already exists"
                )));
            }

            let account = Account {
                name: name.to_string(),
                password_hash: password_hash.to_string(),
                failed_logins: 0,
                created_at: Utc::now(),
            };
            tables.accounts.insert(name.to_string(), account.clone());
            Ok(account)
        })
    }

    fn find_account(&self, name: &str) -> Result<Option<Account>> {
        Ok(self.read()?.accounts.get(name).cloned())
    }

    fn account_exists(&self, name: &str) -> Result<bool> {
        Ok(self.read()?.accounts.contains_key(name))
    }

    fn record_login_failure(&self, name: &str) -> Result<u32> {
        self.mutate(|tables| {
            let account = tables
                .accounts
                .get_mut(name)
                .ok_or_else(|| MsgdropError::NotFound("account".to_string()))?;
            account.failed_logins = account.failed_logins.saturating_add(1);
            Ok(account.failed_logins)
        })
    }

    fn reset_login_failures(&self, name: &str) -> Result<()> {
        self.mutate(|tables| {
            let account = tables
                .accounts
                .get_mut(name)
                .ok_or_else(|| MsgdropError::NotFound("account".to_string()))?;
            account.failed_logins = 0;
            Ok(())
        })
    }
}

impl ServiceRepository for JsonStore {
    fn create_service(&self, name: &str, owner: &str) -> Result<Service> {
        self.mutate(|tables| {
            if tables.services.iter().any(|s| s.name == name) {
                return Err(MsgdropError::Conflict(format!(
                    "service '{name}' already exists"
                )));
            }

            let service = Service {
                name: name.to_string(),
                owner: owner.to_string(),
                created_at: Utc::now(),
            };
            tables.services.push(service.clone());
            Ok(service)
        })
    }

    fn find_service(&self, name: &str) -> Result<Option<Service>> {
        Ok(self
            .read()?
            .services
            .iter()
            .find(|s| s.name == name)
            .cloned())
    }

    fn service_exists(&self, name: &str) -> Result<bool> {
        Ok(self.read()?.services.iter().any(|s| s.name == name))
    }

    fn services_by_owner(&self, owner: &str) -> Result<Vec<Service>> {
        Ok(self
            .read()?
            .services
            .iter()
            .filter(|s| s.owner == owner)
            .cloned()
            .collect())
    }

    fn all_services(&self) -> Result<Vec<Service>> {
        Ok(self.read()?.services.clone())
    }
}
