//! # Core Configuration
//!
//! Builder for the bridge bundle the core needs at runtime. Validation is
//! fail-fast: required bridges are checked at `build()` with actionable
//! messages instead of panicking later at first use.
//!
//! Required:
//! - `SnapshotStore` — the unconditional local backup
//! - `SettingsStore` — persisted cloud account id and small preferences
//!
//! Optional:
//! - `Clock` — defaults to the system clock
//! - `DeckFileAccess` — platforms without a file picker simply never offer
//!   the file sink
//! - `CloudBackup` — without it the cloud sink cannot be connected
//!
//! ```ignore
//! let config = CoreConfig::builder()
//!     .snapshot_store(Arc::new(snapshot))
//!     .settings_store(Arc::new(settings))
//!     .cloud_backup(Arc::new(pantry))
//!     .build()?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{Clock, CloudBackup, DeckFileAccess, SettingsStore, SnapshotStore, SystemClock};

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Debounce window for the file sink. Short: local writes are cheap.
pub const DEFAULT_FILE_DEBOUNCE: Duration = Duration::from_secs(1);

/// Debounce window for the cloud sink. Longer than the file window because
/// cloud writes are costlier and rate-limited.
pub const DEFAULT_CLOUD_DEBOUNCE: Duration = Duration::from_secs(2);

/// Bridge bundle and tuning for the core.
#[derive(Clone)]
pub struct CoreConfig {
    /// Local snapshot store (required)
    pub snapshot_store: Arc<dyn SnapshotStore>,

    /// Settings storage (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Time source
    pub clock: Arc<dyn Clock>,

    /// File sink access, when the platform offers one
    pub file_access: Option<Arc<dyn DeckFileAccess>>,

    /// Cloud backup provider, when configured
    pub cloud_backup: Option<Arc<dyn CloudBackup>>,

    /// Event bus channel capacity
    pub event_buffer_size: usize,

    /// Debounce window for file sink writes
    pub file_debounce: Duration,

    /// Debounce window for cloud sink writes
    pub cloud_debounce: Duration,
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    snapshot_store: Option<Arc<dyn SnapshotStore>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    clock: Option<Arc<dyn Clock>>,
    file_access: Option<Arc<dyn DeckFileAccess>>,
    cloud_backup: Option<Arc<dyn CloudBackup>>,
    event_buffer_size: Option<usize>,
    file_debounce: Option<Duration>,
    cloud_debounce: Option<Duration>,
}

impl CoreConfigBuilder {
    pub fn snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshot_store = Some(store);
        self
    }

    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn file_access(mut self, access: Arc<dyn DeckFileAccess>) -> Self {
        self.file_access = Some(access);
        self
    }

    pub fn cloud_backup(mut self, backup: Arc<dyn CloudBackup>) -> Self {
        self.cloud_backup = Some(backup);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn file_debounce(mut self, window: Duration) -> Self {
        self.file_debounce = Some(window);
        self
    }

    pub fn cloud_debounce(mut self, window: Duration) -> Self {
        self.cloud_debounce = Some(window);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<CoreConfig> {
        let snapshot_store = self.snapshot_store.ok_or_else(|| {
            Error::InvalidConfig(
                "SnapshotStore is required. Provide one with .snapshot_store(...) — \
                 desktop hosts can use bridge_desktop::JsonFileSnapshotStore."
                    .to_string(),
            )
        })?;

        let settings_store = self.settings_store.ok_or_else(|| {
            Error::InvalidConfig(
                "SettingsStore is required. Provide one with .settings_store(...) — \
                 desktop hosts can use bridge_desktop::JsonFileSettingsStore."
                    .to_string(),
            )
        })?;

        let file_debounce = self.file_debounce.unwrap_or(DEFAULT_FILE_DEBOUNCE);
        let cloud_debounce = self.cloud_debounce.unwrap_or(DEFAULT_CLOUD_DEBOUNCE);

        if file_debounce.is_zero() || cloud_debounce.is_zero() {
            return Err(Error::InvalidConfig(
                "Debounce windows must be non-zero".to_string(),
            ));
        }

        Ok(CoreConfig {
            snapshot_store,
            settings_store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            file_access: self.file_access,
            cloud_backup: self.cloud_backup,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            file_debounce,
            cloud_debounce,
        })
    }
}
