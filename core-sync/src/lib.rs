//! # Sync Orchestration
//!
//! Owns the canonical in-memory deck and coordinates its three persistence
//! sinks: the unconditional local snapshot, the opt-in deck file, and the
//! opt-in cloud backup. See [`coordinator::SyncCoordinator`] for the
//! lifecycle and [`connection::CloudConnection`] for the cloud state
//! machine.

pub mod connection;
pub mod coordinator;
pub mod debounce;
pub mod error;

pub use connection::CloudConnection;
pub use coordinator::{FileConnectOutcome, SyncCoordinator, ACCOUNT_ID_KEY};
pub use debounce::DebounceSlot;
pub use error::{Result, SyncError};
