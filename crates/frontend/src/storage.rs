//! `window.localStorage` backed session storage

use tracing::warn;
use viewo_core::StorageError;
use viewo_core::ports::KeyValueStore;
use web_sys::{Storage, Window};

/// Stores raw strings in `localStorage`, readable by the page's own scripts
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn new(window: &Window) -> Result<Self, StorageError> {
        let storage = window
            .local_storage()
            .ok()
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::write(key, format!("{e:?}")))
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            warn!(key, "Failed to remove localStorage entry: {e:?}");
        }
    }
}
