use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("No cloud account connected")]
    NotConnected,

    #[error("No cloud backup provider configured")]
    CloudNotConfigured,

    #[error("Refusing to push an empty deck over a remote backup")]
    EmptyDeckPush,

    #[error("No deck file connected")]
    FileTargetMissing,

    #[error("File sink is not available on this platform")]
    FileSinkUnavailable,

    #[error("File sink is restricted by the host environment")]
    FileSinkRestricted,

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error(transparent)]
    Deck(#[from] core_deck::DeckError),

    #[error(transparent)]
    Bridge(#[from] bridge_traits::BridgeError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
