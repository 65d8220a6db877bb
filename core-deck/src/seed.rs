//! Bundled starter deck
//!
//! Read-only reference data used to seed the canonical collection when the
//! local snapshot is empty or absent. Every seed row carries an explicit
//! `Created At`, so the seeded collection has a stable order independent of
//! load time.

use crate::codec::parse_deck;
use crate::models::Card;

const STARTER_DECK: &str = include_str!("../assets/starter_deck.csv");

/// Parse the bundled starter deck.
///
/// A damaged asset degrades to an empty deck rather than failing startup;
/// the rows all carry timestamps, so the `now` fallback never fires.
pub fn starter_deck() -> Vec<Card> {
    parse_deck(STARTER_DECK, 0)
}
