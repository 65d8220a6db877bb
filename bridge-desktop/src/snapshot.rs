//! Local Snapshot Store on the Filesystem
//!
//! Stores the serialized deck under a fixed record key inside one JSON file,
//! matching the key-value shape the browser build keeps in origin storage.
//! The store is deliberately infallible: a missing or corrupt file reads as
//! `None` (the caller falls back to the starter deck), and write failures are
//! logged and swallowed so degraded disk state never blocks a mutation.

use async_trait::async_trait;
use bridge_traits::storage::SnapshotStore;
use core_deck::Card;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Record key the deck snapshot lives under.
pub const SNAPSHOT_KEY: &str = "lexdeck_cards_v1";

/// JSON-file-backed snapshot store
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lexdeck")
            .join("snapshot.json")
    }

    async fn load_records(&self) -> Option<HashMap<String, Vec<Card>>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read snapshot file");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Corrupt snapshot file ignored");
                None
            }
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn read(&self) -> Option<Vec<Card>> {
        let mut records = self.load_records().await?;
        records.remove(SNAPSHOT_KEY)
    }

    async fn write(&self, cards: &[Card]) {
        let mut records = self.load_records().await.unwrap_or_default();
        records.insert(SNAPSHOT_KEY.to_string(), cards.to_vec());

        let bytes = match serde_json::to_vec(&records) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to serialize snapshot");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!(path = ?parent, error = %e, "Failed to create snapshot directory");
                return;
            }
        }

        // Write-then-rename keeps a crash from leaving a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            warn!(path = ?tmp, error = %e, "Failed to write snapshot");
            return;
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            warn!(path = ?self.path, error = %e, "Failed to replace snapshot");
            return;
        }

        debug!(path = ?self.path, cards = cards.len(), "Snapshot written");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(word: &str) -> Card {
        Card::new(word, None, "a definition", None, "noun", 1_000)
    }

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("snapshot.json"));
        assert!(store.read().await.is_none());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("snapshot.json"));

        store.write(&[card("lumen"), card("serene")]).await;
        let cards = store.read().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].word, "lumen");
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = JsonFileSnapshotStore::new(path);
        assert!(store.read().await.is_none());
    }

    #[tokio::test]
    async fn write_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("snapshot.json"));

        store.write(&[card("old")]).await;
        store.write(&[card("new")]).await;

        let cards = store.read().await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].word, "new");
    }
}
