//! Durable Client Storage
//!
//! Key/value storage that outlives a single render: the browser's local
//! and session storage in a UI, the cookie jar on the server. Writes are best-effort; callers keep their
//! in-memory state when a write fails.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use kernel::error::app_error::AppError;
use thiserror::Error;

/// Well-known storage keys
pub mod keys {
    /// Bearer token used to resolve the current user
    pub const AUTH_TOKEN: &str = "authToken";
    /// Serialized preferences object
    pub const USER_PREFERENCES: &str = "userPreferences";
    /// Why the user was sent to the login page
    pub const LOGIN_INTENT: &str = "loginIntent";
    /// Path to return to after login
    pub const INTENDED_DESTINATION: &str = "intendedDestination";
    /// Session-scoped; set once the dashboard has been shown
    pub const DASHBOARD_VISITED: &str = "dashboardVisited";
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled, full or read-only
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn to_app_error(&self) -> AppError {
        AppError::service_unavailable(self.to_string())
    }
}

/// Key/value client storage
///
/// Methods take `&self`; implementations use interior mutability so a
/// single instance can be shared behind an `Arc`.
pub trait ClientStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: ClientStorage + ?Sized> ClientStorage for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("storage lock poisoned".to_string())
}

// ============================================================================
// MemoryStorage
// ============================================================================

/// In-process storage, also used as session-scoped storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every write (private browsing, quota exceeded)
    pub fn read_only() -> Self {
        Self {
            entries: RwLock::default(),
            read_only: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.read_only {
            return Err(StorageError::Unavailable("read-only storage".to_string()));
        }
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        if self.read_only {
            return Err(StorageError::Unavailable("read-only storage".to_string()));
        }
        self.entries.write().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}
