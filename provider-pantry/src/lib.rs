//! # Pantry Cloud Backup Provider
//!
//! `CloudBackup` implementation over the Pantry key-value service
//! (<https://getpantry.cloud>). The pantry id is the entire credential; the
//! deck lives in one basket that is replaced wholesale on every push.

pub mod client;
pub mod error;
pub mod types;

pub use client::{PantryClient, BASKET_NAME};
pub use error::{PantryError, Result};
pub use types::BasketPayload;
