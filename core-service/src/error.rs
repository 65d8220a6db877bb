use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Sync error: {0}")]
    Sync(#[from] core_sync::SyncError),

    #[error("Deck error: {0}")]
    Deck(#[from] core_deck::DeckError),

    #[cfg(feature = "lookup")]
    #[error("Lookup error: {0}")]
    Lookup(#[from] provider_dictionary::DictionaryError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
