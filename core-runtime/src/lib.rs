//! # Core Runtime
//!
//! Runtime plumbing shared across the Lexdeck core: the bridge
//! configuration bundle, the typed event bus, and the logging bootstrap.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{Error, Result};
pub use events::{CloudEvent, CoreEvent, DeckEvent, EventBus, SyncEvent};
pub use logging::{init_logging, LogFormat, LoggingConfig};
