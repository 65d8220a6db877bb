//! Error types for the Pantry provider

use thiserror::Error;

/// Pantry provider errors
#[derive(Error, Debug)]
pub enum PantryError {
    /// The pantry id does not exist or the service rejected it
    #[error("Pantry account rejected: {0}")]
    InvalidAccount(String),

    /// API request returned an error status
    #[error("Pantry API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse the stored basket
    #[error("Failed to parse basket contents: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Pantry operations
pub type Result<T> = std::result::Result<T, PantryError>;

impl From<PantryError> for bridge_traits::error::BridgeError {
    fn from(error: PantryError) -> Self {
        use bridge_traits::error::BridgeError;
        match error {
            PantryError::InvalidAccount(msg) => BridgeError::InvalidAccount(msg),
            PantryError::ApiError {
                status_code,
                message,
            } => BridgeError::OperationFailed(format!(
                "Pantry API error (status {}): {}",
                status_code, message
            )),
            PantryError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Basket parse error: {}", msg))
            }
            PantryError::BridgeError(e) => e,
        }
    }
}
