use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    /// A manual import where no row parsed into a card. Row-level failures
    /// are skipped silently; this is the only fatal import outcome.
    #[error("No valid cards found in the imported data")]
    EmptyImport,
}

pub type Result<T> = std::result::Result<T, DeckError>;
