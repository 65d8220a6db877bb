//! Deck File Access via the Native Picker
//!
//! Files are only reachable through explicit user consent: the picker
//! returns a handle, and reads/writes take that handle. Declining the
//! dialog is an ordinary `Cancelled` outcome.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{Capability, DeckFileAccess, FileHandle, FilePickOutcome},
};
use tracing::debug;

/// Native file dialog implementation of the deck file sink.
pub struct RfdDeckFileAccess;

impl RfdDeckFileAccess {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RfdDeckFileAccess {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeckFileAccess for RfdDeckFileAccess {
    fn capability(&self) -> Capability {
        Capability::Available
    }

    async fn pick_file(&self) -> Result<FilePickOutcome> {
        let picked = rfd::AsyncFileDialog::new()
            .set_title("Choose a deck file")
            .add_filter("Deck files", &["csv"])
            .pick_file()
            .await;

        match picked {
            Some(file) => {
                let handle = FileHandle::new(file.path().to_path_buf());
                debug!(file = %handle.name, "Deck file picked");
                Ok(FilePickOutcome::Picked(handle))
            }
            None => Ok(FilePickOutcome::Cancelled),
        }
    }

    async fn read_to_string(&self, handle: &FileHandle) -> Result<String> {
        tokio::fs::read_to_string(&handle.path)
            .await
            .map_err(BridgeError::Io)
    }

    async fn write_string(&self, handle: &FileHandle, contents: &str) -> Result<()> {
        tokio::fs::write(&handle.path, contents)
            .await
            .map_err(BridgeError::Io)
    }
}
