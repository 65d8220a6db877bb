//! # Dictionary Lookup Provider
//!
//! Definition lookup (dictionaryapi.dev) and word-completion suggestions
//! (Datamuse) behind the shared `HttpClient` seam. Lookup feeds the
//! lookup-to-deck action; suggestions are purely decorative.

pub mod error;
pub mod lookup;
pub mod suggest;
pub mod types;

pub use error::{DictionaryError, Result};
pub use lookup::DictionaryClient;
pub use suggest::DatamuseClient;
