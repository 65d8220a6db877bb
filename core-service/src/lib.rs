//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, snapshot and
//! settings storage, the file picker, the cloud backup) into the shared deck
//! core and exposes one handle the host UI talks to. Desktop apps typically
//! call [`bootstrap_desktop`] (behind the `desktop-shims` feature); other
//! hosts assemble a [`core_runtime::CoreConfig`] themselves and pass it to
//! [`CoreService::new`].

pub mod error;

pub use error::{CoreError, Result};

pub use core_deck::{Card, CardId, CardStatus, WordEntry};
pub use core_runtime::{CoreConfig, CoreEvent, EventBus};
pub use core_sync::{CloudConnection, FileConnectOutcome};

use std::sync::Arc;

#[cfg(any(feature = "lookup", feature = "desktop-shims"))]
use bridge_traits::http::HttpClient;
use core_sync::SyncCoordinator;
#[cfg(feature = "lookup")]
use tracing::debug;

#[cfg(feature = "lookup")]
use provider_dictionary::{DatamuseClient, DictionaryClient};

#[cfg(feature = "lookup")]
struct LookupClients {
    dictionary: DictionaryClient,
    suggestions: DatamuseClient,
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    coordinator: SyncCoordinator,
    #[cfg(feature = "lookup")]
    lookup: Option<Arc<LookupClients>>,
}

impl CoreService {
    /// Create a new service from an assembled bridge configuration.
    pub fn new(config: CoreConfig) -> Self {
        let events = EventBus::new(config.event_buffer_size);
        Self {
            coordinator: SyncCoordinator::new(config, events),
            #[cfg(feature = "lookup")]
            lookup: None,
        }
    }

    /// Attach the dictionary/suggestion clients over the given HTTP client.
    #[cfg(feature = "lookup")]
    pub fn with_lookup(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.lookup = Some(Arc::new(LookupClients {
            dictionary: DictionaryClient::new(http_client.clone()),
            suggestions: DatamuseClient::new(http_client),
        }));
        self
    }

    /// Load the deck and resume persisted connections. Call once at host
    /// startup, before the first read.
    pub async fn initialize(&self) {
        self.coordinator.initialize().await;
    }

    /// Subscribe to core events for status indicators.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<CoreEvent> {
        self.coordinator.event_bus().subscribe()
    }

    /// Direct access to the sync coordinator.
    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }

    // --- deck --------------------------------------------------------

    pub async fn cards(&self) -> Vec<Card> {
        self.coordinator.cards().await
    }

    pub async fn add_card(
        &self,
        word: impl Into<String>,
        phonetic: Option<String>,
        definition: impl Into<String>,
        example: Option<String>,
        part_of_speech: impl Into<String>,
    ) -> Card {
        self.coordinator
            .add_card(word, phonetic, definition, example, part_of_speech)
            .await
    }

    pub async fn update_status(&self, id: CardId, status: CardStatus) -> Result<()> {
        Ok(self.coordinator.update_status(id, status).await?)
    }

    pub async fn delete_card(&self, id: CardId) -> Result<()> {
        Ok(self.coordinator.delete_card(id).await?)
    }

    pub async fn import_deck(&self, text: &str) -> Result<usize> {
        Ok(self.coordinator.import_deck(text).await?)
    }

    pub async fn export_deck(&self) -> String {
        self.coordinator.export_deck().await
    }

    // --- sinks -------------------------------------------------------

    pub async fn connect_file(&self) -> Result<FileConnectOutcome> {
        Ok(self.coordinator.connect_file().await?)
    }

    pub async fn save_file_now(&self) -> Result<()> {
        Ok(self.coordinator.save_file_now().await?)
    }

    pub async fn connect_cloud(&self, account_id: &str) -> Result<()> {
        Ok(self.coordinator.connect_cloud(account_id).await?)
    }

    pub async fn disconnect_cloud(&self) -> Result<()> {
        Ok(self.coordinator.disconnect_cloud().await?)
    }

    pub async fn pull_now(&self) -> Result<usize> {
        Ok(self.coordinator.pull_now().await?)
    }

    pub async fn push_now(&self) -> Result<()> {
        Ok(self.coordinator.push_now().await?)
    }

    pub async fn cloud_connection(&self) -> CloudConnection {
        self.coordinator.connection().await
    }

    // --- lookup ------------------------------------------------------

    /// Look up a word for the lookup-to-deck flow. `Ok(None)` when the word
    /// has no entry, or when no lookup client is attached.
    #[cfg(feature = "lookup")]
    pub async fn lookup_word(&self, word: &str) -> Result<Option<WordEntry>> {
        match &self.lookup {
            Some(clients) => Ok(clients.dictionary.lookup(word).await?),
            None => {
                debug!("Lookup requested but no lookup client attached");
                Ok(None)
            }
        }
    }

    /// Completion suggestions for the search box. Degrades to empty on any
    /// failure.
    #[cfg(feature = "lookup")]
    pub async fn suggest_words(&self, fragment: &str) -> Vec<String> {
        match &self.lookup {
            Some(clients) => clients.suggestions.suggest(fragment).await,
            None => Vec::new(),
        }
    }

    // --- lifecycle ---------------------------------------------------

    /// Cancel pending debounced writes without flushing.
    pub async fn shutdown(&self) {
        self.coordinator.shutdown().await;
    }
}

/// Convenience bootstrapper for desktop hosts: reqwest HTTP, JSON-file
/// snapshot and settings stores under the platform data directory, the
/// native file picker, and the Pantry cloud backup.
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop() -> Result<CoreService> {
    use bridge_desktop::{
        JsonFileSettingsStore, JsonFileSnapshotStore, ReqwestHttpClient, RfdDeckFileAccess,
    };
    use provider_pantry::PantryClient;

    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let config = CoreConfig::builder()
        .snapshot_store(Arc::new(JsonFileSnapshotStore::new(
            JsonFileSnapshotStore::default_path(),
        )))
        .settings_store(Arc::new(JsonFileSettingsStore::new(
            JsonFileSettingsStore::default_path(),
        )))
        .file_access(Arc::new(RfdDeckFileAccess::new()))
        .cloud_backup(Arc::new(PantryClient::new(http_client.clone())))
        .build()
        .map_err(|e| CoreError::InitializationFailed(e.to_string()))?;

    let service = CoreService::new(config);
    #[cfg(feature = "lookup")]
    let service = service.with_lookup(http_client);
    Ok(service)
}
