//! # Bridge Traits
//!
//! Platform abstraction traits shared across the Lexdeck core. Host
//! platforms implement these to supply HTTP transport, the local snapshot
//! store, the user-consented file sink, settings storage, and a time source;
//! provider crates implement [`storage::CloudBackup`] on top of
//! [`http::HttpClient`].
//!
//! Nothing in this crate performs I/O — it defines seams only.

pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::{BridgeError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::{
    Capability, CloudBackup, DeckFileAccess, FileHandle, FilePickOutcome, SettingsStore,
    SnapshotStore,
};
pub use time::{Clock, ManualClock, SystemClock};
