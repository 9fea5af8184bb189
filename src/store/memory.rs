//! In-memory store backend.
//!
//! The baseline backend: a single `RwLock` over both tables. Every
//! repository operation takes the lock once, so the read-modify-write
//! sequences (duplicate checks, counter updates) are atomic.

use std::sync::RwLock;

use chrono::Utc;

use super::{Account, AccountRepository, Service, ServiceRepository, Tables};
use crate::{MsgdropError, Result};

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
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
}

impl AccountRepository for MemoryStore {
    fn create_account(&self, name: &str, password_hash: &str) -> Result<Account> {
        let mut tables = self.write()?;
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
    }

    fn find_account(&self, name: &str) -> Result<Option<Account>> {
        Ok(self.read()?.accounts.get(name).cloned())
    }

    fn account_exists(&self, name: &str) -> Result<bool> {
        Ok(self.read()?.accounts.contains_key(name))
    }

    fn record_login_failure(&self, name: &str) -> Result<u32> {
        let mut tables = self.write()?;
        let account = tables
            .accounts
            .get_mut(name)
            .ok_or_else(|| MsgdropError::NotFound("account".to_string()))?;
        account.failed_logins = account.failed_logins.saturating_add(1);
        Ok(account.failed_logins)
    }

    fn reset_login_failures(&self, name: &str) -> Result<()> {
        let mut tables = self.write()?;
        let account = tables
            .accounts
            .get_mut(name)
            .ok_or_else(|| MsgdropError::NotFound("account".to_string()))?;
        account.failed_logins = 0;
        Ok(())
    }
}

impl ServiceRepository for MemoryStore {
    fn create_service(&self, name: &str, owner: &str) -> Result<Service> {
        let mut tables = self.write()?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find_account() {
        let store = MemoryStore::new();
        let account = store.create_account("alice", "$argon2id$fake").unwrap();
        assert_eq!(account.name, "alice");
        assert_eq!(account.failed_logins, 0);

        let found = store.find_account("alice").unwrap().unwrap();
        assert_eq!(found.password_hash, "$argon2id$fake");
        assert!(store.find_account("bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let store = MemoryStore::new();
        store.create_account("alice", "hash1").unwrap();

        let result = store.create_account("alice", "hash2");
        assert!(matches!(result, Err(MsgdropError::Conflict(_))));

        // First account's credential is unaffected
        let account = store.find_account("alice").unwrap().unwrap();
        assert_eq!(account.password_hash, "hash1");
    }

    #[test]
    fn test_login_failure_counter() {
        let store = MemoryStore::new();
        store.create_account("alice", "hash").unwrap();

        assert_eq!(store.record_login_failure("alice").unwrap(), 1);
        assert_eq!(store.record_login_failure("alice").unwrap(), 2);
        assert_eq!(store.record_login_failure("alice").unwrap(), 3);

        store.reset_login_failures("alice").unwrap();
        assert_eq!(
            store.find_account("alice").unwrap().unwrap().failed_logins,
            0
        );
    }

    #[test]
    fn test_counter_on_unknown_account() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.record_login_failure("ghost"),
            Err(MsgdropError::NotFound(_))
        ));
        assert!(matches!(
            store.reset_login_failures("ghost"),
            Err(MsgdropError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_service_and_conflict() {
        let store = MemoryStore::new();
        store.create_account("alice", "hash").unwrap();
        store.create_service("alerts", "alice").unwrap();

        assert!(store.service_exists("alerts").unwrap());
        // Taken by any account, not just the same owner
        let result = store.create_service("alerts", "bob");
        assert!(matches!(result, Err(MsgdropError::Conflict(_))));
    }

    #[test]
    fn test_services_by_owner_insertion_order() {
        let store = MemoryStore::new();
        store.create_service("zeta", "alice").unwrap();
        store.create_service("alpha", "alice").unwrap();
        store.create_service("other", "bob").unwrap();
        store.create_service("mid", "alice").unwrap();

        let names: Vec<_> = store
            .services_by_owner("alice")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_all_services() {
        let store = MemoryStore::new();
        store.create_service("a", "alice").unwrap();
        store.create_service("b", "bob").unwrap();
        assert_eq!(store.all_services().unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_failure_counting() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        store.create_account("alice", "hash").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.record_login_failure("alice").unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            store.find_account("alice").unwrap().unwrap().failed_logins,
            200
        );
    }
}
