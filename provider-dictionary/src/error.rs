//! Error types for the dictionary provider

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    /// API request returned an unexpected error status
    #[error("Dictionary API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse the API response
    #[error("Failed to parse dictionary response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
