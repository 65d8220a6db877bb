//! Persistence Sink Abstractions
//!
//! The sync core writes the canonical deck to up to three destinations: a
//! local snapshot store (unconditional backup), a user-granted file, and a
//! key-value cloud backup. Each destination is a trait here so platforms and
//! providers can supply their own implementations.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::Result;
use core_deck::Card;

/// Availability of a platform capability, queried once at startup and passed
/// down as configuration rather than re-checked ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Fully usable on this platform
    Available,
    /// Not present on this platform
    Unavailable,
    /// Present but blocked by the host environment (e.g., sandboxed preview)
    Restricted,
}

/// Local snapshot store
///
/// One record under a fixed key holding the serialized deck. This is the
/// unconditional backup: every mutation writes here regardless of the state
/// of the other sinks, so the contract is deliberately infallible — degraded
/// storage degrades to a silent best-effort no-op, never a user-facing error.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the stored deck.
    ///
    /// Returns `None` when no snapshot exists or the stored content is
    /// corrupt (corrupt content triggers the seed fallback upstream; it is
    /// never fatal).
    async fn read(&self) -> Option<Vec<Card>>;

    /// Write the full deck, replacing any previous snapshot. Best-effort.
    async fn write(&self, cards: &[Card]);
}

/// Handle to a user-granted deck file, held for the session once granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub name: String,
}

impl FileHandle {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, name }
    }
}

/// Outcome of the file consent prompt.
///
/// Declining the picker is an ordinary outcome, not an error — it must never
/// surface to the user as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePickOutcome {
    Picked(FileHandle),
    Cancelled,
}

/// File sink access
///
/// Obtaining a handle requires explicit user consent via a picker dialog.
/// The handle is opaque to the sync core; serialization of the deck to the
/// tabular wire format happens upstream and this trait moves text only.
#[async_trait]
pub trait DeckFileAccess: Send + Sync {
    /// Whether this platform can offer a file sink at all.
    fn capability(&self) -> Capability;

    /// Show the consent picker and return the chosen handle, or `Cancelled`.
    async fn pick_file(&self) -> Result<FilePickOutcome>;

    /// Read the full contents of a previously granted file.
    async fn read_to_string(&self, handle: &FileHandle) -> Result<String>;

    /// Replace the contents of a previously granted file.
    async fn write_string(&self, handle: &FileHandle, contents: &str) -> Result<()>;
}

/// Remote key-value cloud backup
///
/// The remote record is replaced wholesale on push — this is not a patch
/// API, so every push must carry the complete deck.
#[async_trait]
pub trait CloudBackup: Send + Sync {
    /// Check that the account exists before trusting the id.
    async fn validate(&self, account_id: &str) -> Result<()>;

    /// Fetch the remote deck. A missing remote record is an empty deck, not
    /// an error.
    async fn pull(&self, account_id: &str) -> Result<Vec<Card>>;

    /// Replace the remote deck with the full local state.
    async fn push(&self, account_id: &str, cards: &[Card]) -> Result<()>;
}

/// Key-value settings storage for small configuration values (e.g., the
/// persisted cloud account id).
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Retrieve a string value. Returns `Ok(None)` if the key doesn't exist.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Store a string value, replacing any previous value.
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check existence without retrieving the value.
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key).await?.is_some())
    }
}
