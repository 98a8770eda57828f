//! Persistence of identity records.
//!
//! The service keeps two records in a deployment-scoped key-value area: the
//! account currently signed in and the full account directory. Both are JSON
//! values and both are sanitized on the way back in. Failures of the area
//! itself are logged and absorbed, so callers only ever see "nothing stored".

mod sanitize;
mod schema;
mod sqlite;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::Account;

pub use sanitize::{sanitize_account, sanitize_directory, RejectReason};
pub use sqlite::SqliteStore;

/// Key of the record holding the signed-in account.
pub const CURRENT_USER_KEY: &str = "ticketapp_user";
/// Key of the record holding the account directory.
pub const DIRECTORY_KEY: &str = "ticketapp_session";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A durable string-to-string area. Writes replace the whole value.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Reads and writes the identity records over a [`KeyValueStore`].
///
/// A detached adapter has no area: loads return empty defaults and saves do
/// nothing.
#[derive(Clone)]
pub struct StorageAdapter {
    area: Option<Arc<dyn KeyValueStore>>,
}

impl StorageAdapter {
    pub fn new(area: impl KeyValueStore + 'static) -> Self {
        Self {
            area: Some(Arc::new(area)),
        }
    }

    pub fn detached() -> Self {
        Self { area: None }
    }

    pub fn is_attached(&self) -> bool {
        self.area.is_some()
    }

    pub fn load_current_user(&self) -> Option<Account> {
        let value = self.read(CURRENT_USER_KEY)?;
        match sanitize_account(&value) {
            Ok(account) => Some(account),
            Err(reason) => {
                tracing::warn!(%reason, "Ignoring stored current user");
                None
            }
        }
    }

    pub fn load_directory(&self) -> Vec<Account> {
        self.read(DIRECTORY_KEY)
            .map(|value| sanitize_directory(&value))
            .unwrap_or_default()
    }

    /// Store the signed-in account, or remove the record for `None`.
    pub fn save_current_user(&self, account: Option<&Account>) {
        match account {
            Some(account) => self.write(CURRENT_USER_KEY, account),
            None => self.remove(CURRENT_USER_KEY),
        }
    }

    pub fn save_directory(&self, accounts: &[Account]) {
        self.write(DIRECTORY_KEY, accounts)
    }

    /// Parsed value under `key`, or `None` when absent, empty or unreadable.
    fn read(&self, key: &str) -> Option<Value> {
        let area = self.area.as_ref()?;
        let raw = match area.get_item(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored record");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored record is not valid JSON");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(area) = self.area.as_ref() else {
            return;
        };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize record");
                return;
            }
        };
        if let Err(e) = area.set_item(key, &raw) {
            tracing::warn!(key, error = %e, "Failed to write stored record");
        }
    }

    fn remove(&self, key: &str) {
        let Some(area) = self.area.as_ref() else {
            return;
        };
        if let Err(e) = area.remove_item(key) {
            tracing::warn!(key, error = %e, "Failed to remove stored record");
        }
    }
}
