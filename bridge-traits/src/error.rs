use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge capability restricted by the host environment: {0}")]
    Restricted(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
