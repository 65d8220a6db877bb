//! # Event Bus System
//!
//! Event-driven status surface for the core, built on
//! `tokio::sync::broadcast`. Deck mutations, sink writes, and cloud
//! connection transitions are published as typed events; hosts subscribe to
//! drive transient status indicators (saving spinners, sync failures)
//! without the core knowing anything about presentation.
//!
//! Sink failures are events, never propagated errors — a failed cloud push
//! is reported here while canonical state stays untouched.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, SyncEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Sync(SyncEvent::SnapshotWritten { cards: 12 }))
//!     .ok();
//! ```
//!
//! Subscribers should treat `RecvError::Lagged` as non-fatal (they missed
//! transient indicators, nothing more) and `RecvError::Closed` as shutdown.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Canonical deck mutations
    Deck(DeckEvent),
    /// Sink write activity (snapshot, file, cloud)
    Sync(SyncEvent),
    /// Cloud connection lifecycle
    Cloud(CloudEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Deck(e) => e.description(),
            CoreEvent::Sync(e) => e.description(),
            CoreEvent::Cloud(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Sync(SyncEvent::FileSaveFailed { .. })
            | CoreEvent::Sync(SyncEvent::CloudPushFailed { .. })
            | CoreEvent::Sync(SyncEvent::CloudPullFailed { .. })
            | CoreEvent::Cloud(CloudEvent::ConnectFailed { .. }) => EventSeverity::Error,
            CoreEvent::Cloud(CloudEvent::Connected { .. })
            | CoreEvent::Cloud(CloudEvent::Disconnected) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Events describing mutations of the canonical deck.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum DeckEvent {
    /// A card was created from the lookup-to-deck action.
    Added {
        /// The new card's id.
        card_id: String,
        /// The word, for display.
        word: String,
    },
    /// A card was deleted by the user.
    Removed {
        /// The deleted card's id.
        card_id: String,
    },
    /// A review action changed a card's status.
    StatusChanged {
        /// The reviewed card's id.
        card_id: String,
        /// New status wire string.
        status: String,
    },
    /// A batch merged into the canonical deck (cloud pull, file connect,
    /// import).
    Merged {
        /// Cards in the incoming batch.
        incoming: usize,
        /// Canonical size after the merge.
        total: usize,
    },
}

impl DeckEvent {
    fn description(&self) -> &str {
        match self {
            DeckEvent::Added { .. } => "Card added to deck",
            DeckEvent::Removed { .. } => "Card removed from deck",
            DeckEvent::StatusChanged { .. } => "Card status updated",
            DeckEvent::Merged { .. } => "Batch merged into deck",
        }
    }
}

/// Events describing sink write activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SyncEvent {
    /// The local snapshot was re-serialized after a mutation.
    SnapshotWritten {
        /// Number of cards written.
        cards: usize,
    },
    /// A debounced or manual file write started.
    FileSaveStarted,
    /// File write completed.
    FileSaveCompleted {
        /// Number of cards written.
        cards: usize,
    },
    /// File write failed; canonical state is unchanged and the write will
    /// retry on the next debounce cycle or manual save.
    FileSaveFailed {
        /// Human-readable transport error.
        message: String,
    },
    /// A debounced or manual cloud push started.
    CloudPushStarted,
    /// Cloud push completed.
    CloudPushCompleted {
        /// Number of cards pushed.
        cards: usize,
    },
    /// Cloud push failed; the connection stays up for later retries.
    CloudPushFailed {
        /// Human-readable transport error.
        message: String,
    },
    /// Cloud pull merged into the canonical deck.
    CloudPullCompleted {
        /// Cards received from the remote.
        cards: usize,
    },
    /// Cloud pull failed; canonical state is unchanged.
    CloudPullFailed {
        /// Human-readable transport error.
        message: String,
    },
}

impl SyncEvent {
    fn description(&self) -> &str {
        match self {
            SyncEvent::SnapshotWritten { .. } => "Snapshot written",
            SyncEvent::FileSaveStarted => "Saving to file",
            SyncEvent::FileSaveCompleted { .. } => "File save completed",
            SyncEvent::FileSaveFailed { .. } => "File save failed",
            SyncEvent::CloudPushStarted => "Syncing to cloud",
            SyncEvent::CloudPushCompleted { .. } => "Cloud push completed",
            SyncEvent::CloudPushFailed { .. } => "Cloud push failed",
            SyncEvent::CloudPullCompleted { .. } => "Cloud pull completed",
            SyncEvent::CloudPullFailed { .. } => "Cloud pull failed",
        }
    }
}

/// Events describing the cloud connection lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CloudEvent {
    /// Account id validation in progress.
    Validating,
    /// Account validated; connection established.
    Connected {
        /// The connected account id.
        account_id: String,
    },
    /// Validation failed; nothing was persisted or mutated.
    ConnectFailed {
        /// Human-readable failure reason.
        message: String,
    },
    /// Connection cleared by explicit user disconnect.
    Disconnected,
}

impl CloudEvent {
    fn description(&self) -> &str {
        match self {
            CloudEvent::Validating => "Validating cloud account",
            CloudEvent::Connected { .. } => "Cloud account connected",
            CloudEvent::ConnectFailed { .. } => "Cloud connection failed",
            CloudEvent::Disconnected => "Cloud account disconnected",
        }
    }
}

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally: multiple producers (clone the
/// bus), multiple independent consumers, non-blocking sends, and lagging
/// detection for slow subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error when there are none. Emitting into a subscriber-less bus is
    /// ordinary during startup, so callers usually `.ok()` the result.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive future events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Number of currently active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_reaches_all_subscribers() {
        let bus = EventBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let event = CoreEvent::Sync(SyncEvent::SnapshotWritten { cards: 3 });
        let delivered = bus.emit(event.clone()).unwrap();
        assert_eq!(delivered, 2);

        assert_eq!(a.recv().await.unwrap(), event);
        assert_eq!(b.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn emit_without_subscribers_errors() {
        let bus = EventBus::new(8);
        assert!(bus
            .emit(CoreEvent::Cloud(CloudEvent::Disconnected))
            .is_err());
    }

    #[test]
    fn severity_classification() {
        let failed = CoreEvent::Sync(SyncEvent::CloudPushFailed {
            message: "boom".to_string(),
        });
        assert_eq!(failed.severity(), EventSeverity::Error);

        let connected = CoreEvent::Cloud(CloudEvent::Connected {
            account_id: "acct".to_string(),
        });
        assert_eq!(connected.severity(), EventSeverity::Info);

        let written = CoreEvent::Sync(SyncEvent::SnapshotWritten { cards: 1 });
        assert_eq!(written.severity(), EventSeverity::Debug);
    }

    #[test]
    fn events_serialize_with_tagged_layout() {
        let event = CoreEvent::Deck(DeckEvent::Merged {
            incoming: 2,
            total: 5,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Deck");
        assert_eq!(json["payload"]["event"], "Merged");
    }
}
