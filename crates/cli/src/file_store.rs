//! Session entries persisted as a JSON object on disk

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use viewo_core::StorageError;
use viewo_core::ports::KeyValueStore;

pub const SESSION_FILE: &str = "session.json";

/// [`KeyValueStore`] that rewrites its file on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open `path`, starting empty when it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Corrupt session file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No session file yet");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(&*self.entries.borrow())?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write then rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        restrict_permissions(&tmp)?;
        fs::rename(&tmp, &self.path)
    }
}

/// Tokens are credentials: owner read/write only
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.persist()
            .map_err(|e| StorageError::write(key, e.to_string()))
    }

    fn remove(&self, key: &str) {
        if self.entries.borrow_mut().remove(key).is_none() {
            return;
        }
        if let Err(e) = self.persist() {
            warn!(key, path = %self.path.display(), "Failed to persist removal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join(SESSION_FILE);

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("viewo_access_token"), None);
        store.set("viewo_access_token", "abc").unwrap();
        store.set("viewo_user", r#"{"username":"admin"}"#).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("viewo_access_token").as_deref(), Some("abc"));
        assert_eq!(
            reopened.get("viewo_user").as_deref(),
            Some(r#"{"username":"admin"}"#)
        );
    }

    #[test]
    fn test_remove_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SESSION_FILE);

        let store = JsonFileStore::open(&path).unwrap();
        store.set("viewo_refresh_token", "r1").unwrap();
        store.remove("viewo_refresh_token");
        store.remove("never_set");

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("viewo_refresh_token"), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SESSION_FILE);
        fs::write(&path, "not json").unwrap();

        let error = JsonFileStore::open(&path).unwrap_err();
        assert!(error.to_string().contains("Corrupt session file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SESSION_FILE);
        let store = JsonFileStore::open(&path).unwrap();
        store.set("viewo_access_token", "abc").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
