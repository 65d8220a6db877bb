//! # Desktop Bridge Implementations
//!
//! Concrete bridge implementations for desktop platforms: reqwest HTTP,
//! JSON-file snapshot and settings stores, and the native file picker for
//! the deck file sink (behind the `file-dialog` feature).

#[cfg(feature = "file-dialog")]
pub mod file_dialog;
pub mod http;
pub mod settings;
pub mod snapshot;

#[cfg(feature = "file-dialog")]
pub use file_dialog::RfdDeckFileAccess;
pub use http::ReqwestHttpClient;
pub use settings::JsonFileSettingsStore;
pub use snapshot::{JsonFileSnapshotStore, SNAPSHOT_KEY};
