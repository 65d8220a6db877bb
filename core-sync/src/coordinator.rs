//! # Sync Coordinator
//!
//! Process-wide orchestrator for the canonical deck and its persistence
//! sinks. On startup it loads from the sinks in priority order (local
//! snapshot, bundled starter deck, then an async cloud pull), feeding each
//! batch through the merge engine. In steady state every mutation:
//!
//! 1. re-serializes to the local snapshot store inside the mutation step
//!    (unconditional backup, no debounce),
//! 2. schedules a debounced write to the file sink when a file is
//!    connected,
//! 3. schedules a debounced push to the cloud sink when the connection is
//!    armed and the deck is non-empty,
//! 4. emits a typed event for the host's status indicators.
//!
//! Sink failures never propagate into the canonical state: they are caught
//! here and turned into events. Manual save/pull/push bypass debouncing and
//! surface their errors.
//!
//! Each scheduled write captures the full deck at schedule time, so writes
//! are idempotent and commute with respect to completion order; the
//! single-slot debounce makes last-writer-by-schedule the last writer.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use bridge_traits::{
    Capability, Clock, CloudBackup, DeckFileAccess, FileHandle, FilePickOutcome, SettingsStore,
    SnapshotStore,
};
use core_deck::{codec, merge, seed, Card, CardId, CardStatus};
use core_runtime::{CloudEvent, CoreConfig, CoreEvent, DeckEvent, EventBus, SyncEvent};

use crate::connection::CloudConnection;
use crate::debounce::DebounceSlot;
use crate::error::{Result, SyncError};

/// Settings key holding the persisted cloud account id.
pub const ACCOUNT_ID_KEY: &str = "lexdeck_cloud_account";

/// Outcome of the file-connect flow. Declining the picker is an ordinary
/// outcome, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileConnectOutcome {
    Connected {
        handle: FileHandle,
        /// Cards read from the file and merged on connect.
        imported: usize,
    },
    Cancelled,
}

struct SyncState {
    canonical: Vec<Card>,
    file_target: Option<FileHandle>,
    connection: CloudConnection,
}

struct Inner {
    snapshot: Arc<dyn SnapshotStore>,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    file_access: Option<Arc<dyn DeckFileAccess>>,
    cloud: Option<Arc<dyn CloudBackup>>,
    events: EventBus,
    state: Mutex<SyncState>,
    file_slot: DebounceSlot,
    cloud_slot: DebounceSlot,
    file_debounce: std::time::Duration,
    cloud_debounce: std::time::Duration,
    shutdown: CancellationToken,
}

/// The sync orchestrator. Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct SyncCoordinator {
    inner: Arc<Inner>,
}

impl SyncCoordinator {
    pub fn new(config: CoreConfig, events: EventBus) -> Self {
        Self {
            inner: Arc::new(Inner {
                snapshot: config.snapshot_store,
                settings: config.settings_store,
                clock: config.clock,
                file_access: config.file_access,
                cloud: config.cloud_backup,
                events,
                state: Mutex::new(SyncState {
                    canonical: Vec::new(),
                    file_target: None,
                    connection: CloudConnection::Disconnected,
                }),
                file_slot: DebounceSlot::new(),
                cloud_slot: DebounceSlot::new(),
                file_debounce: config.file_debounce,
                cloud_debounce: config.cloud_debounce,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.events
    }

    // ------------------------------------------------------------------
    // Startup
    // ------------------------------------------------------------------

    /// Load the deck and resume any persisted cloud connection.
    ///
    /// Steps 1–3 complete before this returns: snapshot read, starter-deck
    /// fallback, canonical committed and visible. The cloud pull (step 4)
    /// runs in a background task so callers never block on the network; the
    /// connection is only armed for auto-push after that pull attempt
    /// finishes, success or failure.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        let stored = self.inner.snapshot.read().await;
        let seeded = match stored {
            Some(cards) if !cards.is_empty() => {
                debug!(cards = cards.len(), "Loaded deck from local snapshot");
                cards
            }
            _ => {
                info!("Local snapshot absent or empty; loading starter deck");
                seed::starter_deck()
            }
        };

        {
            let mut state = self.inner.state.lock().await;
            state.canonical = merge::sorted(seeded);
        }

        let account = match self.inner.settings.get_string(ACCOUNT_ID_KEY).await {
            Ok(Some(account)) if !account.is_empty() => account,
            Ok(_) => return,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cloud account id");
                return;
            }
        };

        {
            let mut state = self.inner.state.lock().await;
            if let Err(e) = state.connection.resume(&account) {
                warn!(error = %e, "Could not resume cloud connection");
                return;
            }
        }

        let coordinator = self.clone();
        let token = self.inner.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = coordinator.resume_cloud(account) => {}
            }
        });
    }

    async fn resume_cloud(&self, account_id: String) {
        let Some(cloud) = self.inner.cloud.clone() else {
            warn!("Persisted cloud account id but no cloud backup configured");
            return;
        };

        let pulled = async {
            cloud.validate(&account_id).await?;
            cloud.pull(&account_id).await
        }
        .await;

        match pulled {
            Ok(remote) => {
                let incoming = remote.len();
                self.emit(CoreEvent::Sync(SyncEvent::CloudPullCompleted {
                    cards: incoming,
                }));
                if incoming > 0 {
                    let mut state = self.inner.state.lock().await;
                    state.canonical = merge(&state.canonical, remote);
                    let total = state.canonical.len();
                    self.commit(&mut state, Some(DeckEvent::Merged { incoming, total }))
                        .await;
                }
            }
            Err(e) => {
                warn!(error = %e, "Initial cloud pull failed");
                self.emit(CoreEvent::Sync(SyncEvent::CloudPullFailed {
                    message: e.to_string(),
                }));
            }
        }

        // Armed only now, after the pull attempt: a fresh empty local state
        // must never clobber an unread remote backup.
        let mut state = self.inner.state.lock().await;
        if let Err(e) = state.connection.arm() {
            debug!(error = %e, "Connection gone before arming");
        }
    }

    // ------------------------------------------------------------------
    // Canonical reads
    // ------------------------------------------------------------------

    pub async fn cards(&self) -> Vec<Card> {
        self.inner.state.lock().await.canonical.clone()
    }

    pub async fn connection(&self) -> CloudConnection {
        self.inner.state.lock().await.connection.clone()
    }

    pub async fn file_target(&self) -> Option<FileHandle> {
        self.inner.state.lock().await.file_target.clone()
    }

    /// Serialize the canonical deck to the tabular export format.
    pub async fn export_deck(&self) -> String {
        let state = self.inner.state.lock().await;
        codec::generate_deck(&state.canonical)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create a card from the lookup-to-deck action and prepend it.
    #[instrument(skip_all)]
    pub async fn add_card(
        &self,
        word: impl Into<String>,
        phonetic: Option<String>,
        definition: impl Into<String>,
        example: Option<String>,
        part_of_speech: impl Into<String>,
    ) -> Card {
        let card = Card::new(
            word,
            phonetic,
            definition,
            example,
            part_of_speech,
            self.inner.clock.now_millis(),
        );

        let mut state = self.inner.state.lock().await;
        state.canonical.insert(0, card.clone());
        self.commit(
            &mut state,
            Some(DeckEvent::Added {
                card_id: card.id.to_string(),
                word: card.word.clone(),
            }),
        )
        .await;

        card
    }

    /// Record a review action: set the status and stamp `last_reviewed`.
    pub async fn update_status(&self, id: CardId, status: CardStatus) -> Result<()> {
        let now = self.inner.clock.now_millis();
        let mut state = self.inner.state.lock().await;

        let card = state
            .canonical
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or_else(|| SyncError::CardNotFound(id.to_string()))?;
        card.status = status;
        card.last_reviewed = now;

        self.commit(
            &mut state,
            Some(DeckEvent::StatusChanged {
                card_id: id.to_string(),
                status: status.as_wire_str().to_string(),
            }),
        )
        .await;

        Ok(())
    }

    /// Delete a card. Deletions are not tombstoned: a later merge from a
    /// sink still holding the card will resurrect it.
    pub async fn delete_card(&self, id: CardId) -> Result<()> {
        let mut state = self.inner.state.lock().await;

        let before = state.canonical.len();
        state.canonical.retain(|card| card.id != id);
        if state.canonical.len() == before {
            return Err(SyncError::CardNotFound(id.to_string()));
        }

        self.commit(
            &mut state,
            Some(DeckEvent::Removed {
                card_id: id.to_string(),
            }),
        )
        .await;

        Ok(())
    }

    /// Merge a manually imported tabular batch into the deck.
    ///
    /// Row-level parse failures skip only that row; an import where no row
    /// survived is the single fatal import outcome.
    #[instrument(skip_all)]
    pub async fn import_deck(&self, text: &str) -> Result<usize> {
        let cards = codec::parse_deck(text, self.inner.clock.now_millis());
        if cards.is_empty() {
            return Err(core_deck::DeckError::EmptyImport.into());
        }

        let incoming = cards.len();
        let mut state = self.inner.state.lock().await;
        state.canonical = merge(&state.canonical, cards);
        let total = state.canonical.len();
        self.commit(&mut state, Some(DeckEvent::Merged { incoming, total }))
            .await;

        info!(incoming, total, "Imported deck batch");
        Ok(incoming)
    }

    /// Merge a batch arriving from an external source (e.g. an extension
    /// writing through the same contract).
    pub async fn merge_remote(&self, cards: Vec<Card>) -> usize {
        let incoming = cards.len();
        if incoming == 0 {
            return 0;
        }

        let mut state = self.inner.state.lock().await;
        state.canonical = merge(&state.canonical, cards);
        let total = state.canonical.len();
        self.commit(&mut state, Some(DeckEvent::Merged { incoming, total }))
            .await;
        incoming
    }

    // ------------------------------------------------------------------
    // File sink
    // ------------------------------------------------------------------

    /// Ask the user for a deck file, merge its current contents, and hold
    /// the handle as the session's file sink.
    #[instrument(skip(self))]
    pub async fn connect_file(&self) -> Result<FileConnectOutcome> {
        let access = self
            .inner
            .file_access
            .clone()
            .ok_or(SyncError::FileSinkUnavailable)?;

        match access.capability() {
            Capability::Available => {}
            Capability::Unavailable => return Err(SyncError::FileSinkUnavailable),
            Capability::Restricted => return Err(SyncError::FileSinkRestricted),
        }

        let handle = match access.pick_file().await? {
            FilePickOutcome::Picked(handle) => handle,
            FilePickOutcome::Cancelled => {
                debug!("File picker dismissed");
                return Ok(FileConnectOutcome::Cancelled);
            }
        };

        let text = access.read_to_string(&handle).await?;
        let loaded = codec::parse_deck(&text, self.inner.clock.now_millis());
        let imported = loaded.len();

        {
            let mut state = self.inner.state.lock().await;
            state.file_target = Some(handle.clone());
            if imported > 0 {
                state.canonical = merge(&state.canonical, loaded);
                let total = state.canonical.len();
                self.commit(
                    &mut state,
                    Some(DeckEvent::Merged {
                        incoming: imported,
                        total,
                    }),
                )
                .await;
            } else {
                // Nothing to merge, but the freshly connected file should
                // still receive the current deck.
                self.schedule_file_flush(state.canonical.clone()).await;
            }
        }

        info!(file = %handle.name, imported, "Deck file connected");
        Ok(FileConnectOutcome::Connected { handle, imported })
    }

    /// Manual save: bypasses debouncing, surfaces failure.
    #[instrument(skip(self))]
    pub async fn save_file_now(&self) -> Result<()> {
        let access = self
            .inner
            .file_access
            .clone()
            .ok_or(SyncError::FileSinkUnavailable)?;
        let (handle, cards) = {
            let state = self.inner.state.lock().await;
            let handle = state
                .file_target
                .clone()
                .ok_or(SyncError::FileTargetMissing)?;
            (handle, state.canonical.clone())
        };

        self.inner.file_slot.cancel().await;
        self.emit(CoreEvent::Sync(SyncEvent::FileSaveStarted));

        let text = codec::generate_deck(&cards);
        match access.write_string(&handle, &text).await {
            Ok(()) => {
                self.emit(CoreEvent::Sync(SyncEvent::FileSaveCompleted {
                    cards: cards.len(),
                }));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Manual file save failed");
                self.emit(CoreEvent::Sync(SyncEvent::FileSaveFailed {
                    message: e.to_string(),
                }));
                Err(e.into())
            }
        }
    }

    // ------------------------------------------------------------------
    // Cloud sink
    // ------------------------------------------------------------------

    /// Connect a cloud account: validate, pull+merge, persist the account
    /// id, then arm auto-push, in that order. Calling this while already
    /// connected switches accounts through the same sequence. A validation
    /// failure aborts before the deck is touched and leaves the connection
    /// down.
    #[instrument(skip(self))]
    pub async fn connect_cloud(&self, account_id: &str) -> Result<()> {
        let cloud = self
            .inner
            .cloud
            .clone()
            .ok_or(SyncError::CloudNotConfigured)?;

        {
            let mut state = self.inner.state.lock().await;
            state.connection.begin_validation(account_id)?;
        }
        // A flush scheduled against the previous account must not fire
        // mid-switch.
        self.inner.cloud_slot.cancel().await;
        self.emit(CoreEvent::Cloud(CloudEvent::Validating));

        if let Err(e) = cloud.validate(account_id).await {
            let mut state = self.inner.state.lock().await;
            state.connection.fail_validation()?;
            drop(state);
            self.emit(CoreEvent::Cloud(CloudEvent::ConnectFailed {
                message: e.to_string(),
            }));
            return Err(e.into());
        }

        // Pull is best-effort during connect: a transport failure here is
        // reported but leaves the connection usable for manual retries.
        match cloud.pull(account_id).await {
            Ok(remote) => {
                let incoming = remote.len();
                self.emit(CoreEvent::Sync(SyncEvent::CloudPullCompleted {
                    cards: incoming,
                }));
                if incoming > 0 {
                    let mut state = self.inner.state.lock().await;
                    state.canonical = merge(&state.canonical, remote);
                    let total = state.canonical.len();
                    self.commit(&mut state, Some(DeckEvent::Merged { incoming, total }))
                        .await;
                }
            }
            Err(e) => {
                warn!(error = %e, "Pull during connect failed");
                self.emit(CoreEvent::Sync(SyncEvent::CloudPullFailed {
                    message: e.to_string(),
                }));
            }
        }

        if let Err(e) = self
            .inner
            .settings
            .set_string(ACCOUNT_ID_KEY, account_id)
            .await
        {
            // The connection still works for this session; only the resume
            // on next startup is lost.
            warn!(error = %e, "Failed to persist cloud account id");
        }

        {
            let mut state = self.inner.state.lock().await;
            state.connection.connect(true)?;
            // A non-empty deck flows to the freshly connected remote the
            // same way it would after any mutation.
            if !state.canonical.is_empty() {
                self.schedule_cloud_flush(state.canonical.clone()).await;
            }
        }

        self.emit(CoreEvent::Cloud(CloudEvent::Connected {
            account_id: account_id.to_string(),
        }));
        info!(account_id, "Cloud account connected");
        Ok(())
    }

    /// Disconnect the cloud account. Clears the target and the persisted
    /// id; the canonical deck and every sink's stored copy stay untouched.
    #[instrument(skip(self))]
    pub async fn disconnect_cloud(&self) -> Result<()> {
        {
            let mut state = self.inner.state.lock().await;
            state.connection.disconnect();
        }
        self.inner.cloud_slot.cancel().await;
        self.inner.settings.delete(ACCOUNT_ID_KEY).await?;
        self.emit(CoreEvent::Cloud(CloudEvent::Disconnected));
        info!("Cloud account disconnected");
        Ok(())
    }

    /// Manual pull: fetch the remote deck and merge it in. Bypasses
    /// debouncing and surfaces failure.
    #[instrument(skip(self))]
    pub async fn pull_now(&self) -> Result<usize> {
        let cloud = self
            .inner
            .cloud
            .clone()
            .ok_or(SyncError::CloudNotConfigured)?;
        let account = {
            let state = self.inner.state.lock().await;
            if !state.connection.is_connected() {
                return Err(SyncError::NotConnected);
            }
            state.connection.account_id().map(str::to_string)
        }
        .ok_or(SyncError::NotConnected)?;

        match cloud.pull(&account).await {
            Ok(remote) => {
                let incoming = remote.len();
                self.emit(CoreEvent::Sync(SyncEvent::CloudPullCompleted {
                    cards: incoming,
                }));
                if incoming > 0 {
                    let mut state = self.inner.state.lock().await;
                    state.canonical = merge(&state.canonical, remote);
                    let total = state.canonical.len();
                    self.commit(&mut state, Some(DeckEvent::Merged { incoming, total }))
                        .await;
                }
                Ok(incoming)
            }
            Err(e) => {
                warn!(error = %e, "Manual cloud pull failed");
                self.emit(CoreEvent::Sync(SyncEvent::CloudPullFailed {
                    message: e.to_string(),
                }));
                Err(e.into())
            }
        }
    }

    /// Manual push: replace the remote with the full local deck. Bypasses
    /// debouncing and surfaces failure. Refuses to push an empty deck.
    #[instrument(skip(self))]
    pub async fn push_now(&self) -> Result<()> {
        let cloud = self
            .inner
            .cloud
            .clone()
            .ok_or(SyncError::CloudNotConfigured)?;
        let (account, cards) = {
            let state = self.inner.state.lock().await;
            if !state.connection.is_connected() {
                return Err(SyncError::NotConnected);
            }
            let account = state
                .connection
                .account_id()
                .map(str::to_string)
                .ok_or(SyncError::NotConnected)?;
            (account, state.canonical.clone())
        };

        if cards.is_empty() {
            return Err(SyncError::EmptyDeckPush);
        }

        self.inner.cloud_slot.cancel().await;
        self.emit(CoreEvent::Sync(SyncEvent::CloudPushStarted));

        match cloud.push(&account, &cards).await {
            Ok(()) => {
                self.emit(CoreEvent::Sync(SyncEvent::CloudPushCompleted {
                    cards: cards.len(),
                }));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Manual cloud push failed");
                self.emit(CoreEvent::Sync(SyncEvent::CloudPushFailed {
                    message: e.to_string(),
                }));
                Err(e.into())
            }
        }
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Cancel all pending debounce timers without flushing. The data-loss
    /// window is bounded by the debounce interval; the snapshot store is
    /// always current because it is written inside every mutation step.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.inner.file_slot.cancel().await;
        self.inner.cloud_slot.cancel().await;
        debug!("Sync coordinator shut down");
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Persist a completed mutation: snapshot synchronously, sinks
    /// debounced, event out. `state` is the locked state that was mutated.
    async fn commit(&self, state: &mut SyncState, event: Option<DeckEvent>) {
        self.inner.snapshot.write(&state.canonical).await;
        self.emit(CoreEvent::Sync(SyncEvent::SnapshotWritten {
            cards: state.canonical.len(),
        }));

        if state.file_target.is_some() {
            self.schedule_file_flush(state.canonical.clone()).await;
        }

        if state.connection.is_armed() && !state.canonical.is_empty() {
            self.schedule_cloud_flush(state.canonical.clone()).await;
        }

        if let Some(event) = event {
            self.emit(CoreEvent::Deck(event));
        }
    }

    async fn schedule_file_flush(&self, cards: Vec<Card>) {
        let coordinator = self.clone();
        self.inner
            .file_slot
            .schedule(self.inner.file_debounce, async move {
                coordinator.flush_file(cards).await;
            })
            .await;
    }

    async fn schedule_cloud_flush(&self, cards: Vec<Card>) {
        let coordinator = self.clone();
        self.inner
            .cloud_slot
            .schedule(self.inner.cloud_debounce, async move {
                coordinator.flush_cloud(cards).await;
            })
            .await;
    }

    /// Debounced file write. Re-checks the target at fire time; failures
    /// become events and retry naturally on the next cycle.
    async fn flush_file(&self, cards: Vec<Card>) {
        let Some(access) = self.inner.file_access.clone() else {
            return;
        };
        let Some(handle) = self.inner.state.lock().await.file_target.clone() else {
            return;
        };

        self.emit(CoreEvent::Sync(SyncEvent::FileSaveStarted));
        let text = codec::generate_deck(&cards);
        match access.write_string(&handle, &text).await {
            Ok(()) => {
                debug!(file = %handle.name, cards = cards.len(), "Deck file saved");
                self.emit(CoreEvent::Sync(SyncEvent::FileSaveCompleted {
                    cards: cards.len(),
                }));
            }
            Err(e) => {
                warn!(error = %e, "Debounced file save failed");
                self.emit(CoreEvent::Sync(SyncEvent::FileSaveFailed {
                    message: e.to_string(),
                }));
            }
        }
    }

    /// Debounced cloud push. Re-checks the armed connection at fire time so
    /// a disconnect between schedule and fire skips the write.
    async fn flush_cloud(&self, cards: Vec<Card>) {
        let Some(cloud) = self.inner.cloud.clone() else {
            return;
        };
        let account = {
            let state = self.inner.state.lock().await;
            if !state.connection.is_armed() {
                debug!("Cloud flush skipped: connection no longer armed");
                return;
            }
            state.connection.account_id().map(str::to_string)
        };
        let Some(account) = account else { return };

        if cards.is_empty() {
            return;
        }

        self.emit(CoreEvent::Sync(SyncEvent::CloudPushStarted));
        match cloud.push(&account, &cards).await {
            Ok(()) => {
                debug!(cards = cards.len(), "Deck pushed to cloud backup");
                self.emit(CoreEvent::Sync(SyncEvent::CloudPushCompleted {
                    cards: cards.len(),
                }));
            }
            Err(e) => {
                warn!(error = %e, "Debounced cloud push failed");
                self.emit(CoreEvent::Sync(SyncEvent::CloudPushFailed {
                    message: e.to_string(),
                }));
            }
        }
    }

    fn emit(&self, event: CoreEvent) {
        // Emitting into a subscriber-less bus is ordinary during startup.
        self.inner.events.emit(event).ok();
    }
}
