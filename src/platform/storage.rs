//! Key/value storage
//!
//! LocalStorage in the browser, a `HashMap` everywhere else (native runs and
//! tests).

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage operation failed: {0}")]
    Backend(String),
}

/// Minimal string key/value store
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable, records will not persist");
        }
        Self { inner }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
        self.inner.as_ref().ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}
