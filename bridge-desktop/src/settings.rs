//! Settings Storage as a JSON File
//!
//! Small key-value configuration (the persisted cloud account id, mainly)
//! kept in one JSON object on disk. Reads tolerate a corrupt file by
//! treating it as empty; writes go through a temp-file rename.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SettingsStore,
};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// JSON-file-backed settings store
pub struct JsonFileSettingsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the backing file.
    lock: Mutex<()>,
}

impl JsonFileSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lexdeck")
            .join("settings.json")
    }

    async fn load(&self) -> HashMap<String, String> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read settings file");
                return HashMap::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(path = ?self.path, error = %e, "Corrupt settings file treated as empty");
            HashMap::new()
        })
    }

    async fn store(&self, values: &HashMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(values)
            .map_err(|e| BridgeError::OperationFailed(format!("Settings serialization: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(BridgeError::Io)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(BridgeError::Io)?;

        debug!(path = ?self.path, keys = values.len(), "Settings written");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await.get(key).cloned())
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut values = self.load().await;
        values.insert(key.to_string(), value.to_string());
        self.store(&values).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut values = self.load().await;
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.store(&values).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.get_string("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_get_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));

        store.set_string("account", "basket-1").await.unwrap();
        assert_eq!(
            store.get_string("account").await.unwrap().as_deref(),
            Some("basket-1")
        );
        assert!(store.has_key("account").await.unwrap());

        store.delete("account").await.unwrap();
        assert_eq!(store.get_string("account").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_missing_key_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));
        store.delete("never-set").await.unwrap();
    }

    #[tokio::test]
    async fn values_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        JsonFileSettingsStore::new(path.clone())
            .set_string("account", "basket-1")
            .await
            .unwrap();

        let reopened = JsonFileSettingsStore::new(path);
        assert_eq!(
            reopened.get_string("account").await.unwrap().as_deref(),
            Some("basket-1")
        );
    }
}
