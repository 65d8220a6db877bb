//! Wire types for the Pantry basket contract

use core_deck::Card;
use serde::{Deserialize, Serialize};

/// The single record stored in the deck basket.
///
/// The basket is replaced wholesale on every push; there is no patch or
/// per-card endpoint, so this payload always carries the complete deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketPayload {
    pub cards: Vec<Card>,
}

/// Subset of the pantry details response used for account validation.
#[derive(Debug, Clone, Deserialize)]
pub struct PantryDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub baskets: Vec<BasketRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasketRef {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basket_payload_uses_camel_case_cards() {
        let payload = BasketPayload {
            cards: vec![Card::new(
                "lumen",
                None,
                "a unit of luminous flux",
                None,
                "noun",
                1_700_000_000_000,
            )],
        };

        let json = serde_json::to_value(&payload).unwrap();
        let card = &json["cards"][0];
        assert!(card.get("partOfSpeech").is_some());
        assert!(card.get("createdAt").is_some());
        assert!(card.get("part_of_speech").is_none());
    }

    #[test]
    fn pantry_details_tolerates_missing_fields() {
        let details: PantryDetails = serde_json::from_str("{}").unwrap();
        assert!(details.baskets.is_empty());
    }
}
