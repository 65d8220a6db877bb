//! # Deck Domain
//!
//! The flashcard domain: the `Card` model, the identity & merge engine, the
//! tabular wire codec, and the bundled starter deck. Everything here is
//! pure — persistence and orchestration live in `core-sync` and the bridge
//! crates.

pub mod codec;
pub mod entry;
pub mod error;
pub mod merge;
pub mod models;
pub mod seed;

pub use codec::{generate_deck, parse_deck};
pub use entry::{Definition, Meaning, WordEntry};
pub use error::{DeckError, Result};
pub use merge::merge;
pub use models::{Card, CardId, CardStatus};
pub use seed::starter_deck;
