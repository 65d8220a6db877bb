//! Domain models for the flashcard deck
//!
//! `Card` is the canonical unit of study. Identity is two-layered: the
//! content key (case-folded word + byte-exact definition) is the true
//! identity used for deduplication, while the `id` is a secondary key that
//! is preserved opportunistically across merges.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a card
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CardId(pub Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of a card. A simple three-state tag, not a scheduling
/// algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CardStatus {
    #[default]
    New,
    Learning,
    Mastered,
}

impl CardStatus {
    /// Wire form used by the tabular format and the cloud record.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            CardStatus::New => "New",
            CardStatus::Learning => "Learning",
            CardStatus::Mastered => "Mastered",
        }
    }

    /// Lenient parse for imported data: absent or unrecognized values fall
    /// back to `New`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Learning" => CardStatus::Learning,
            "Mastered" => CardStatus::Mastered,
            _ => CardStatus::New,
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// A flashcard
///
/// Serialized with camelCase field names to match the snapshot and cloud
/// wire formats. Timestamps are epoch milliseconds; `last_reviewed` of 0
/// means never reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub main_definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub part_of_speech: String,
    #[serde(default)]
    pub status: CardStatus,
    #[serde(default)]
    pub last_reviewed: i64,
    pub created_at: i64,
}

impl Card {
    /// Create a fresh card from the lookup-to-deck action.
    pub fn new(
        word: impl Into<String>,
        phonetic: Option<String>,
        main_definition: impl Into<String>,
        example: Option<String>,
        part_of_speech: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id: CardId::new(),
            word: word.into(),
            phonetic,
            main_definition: main_definition.into(),
            example,
            part_of_speech: part_of_speech.into(),
            status: CardStatus::New,
            last_reviewed: 0,
            created_at: now_ms,
        }
    }

    /// The deduplication identity: word case-folded, definition byte-exact.
    ///
    /// Only the word is case-folded. Trivially reworded definitions produce
    /// distinct cards for the same word; that asymmetry is intentional.
    pub fn content_key(&self) -> (String, &str) {
        (self.word.to_lowercase(), self.main_definition.as_str())
    }

    /// Whether `other` has the same content key as `self`.
    pub fn same_content(&self, other: &Card) -> bool {
        self.content_key() == other.content_key()
    }

    /// Overlay `incoming` onto an existing card.
    ///
    /// The contract, field by field: every field carried by the incoming
    /// record wins, except `id`, which stays with the existing card so that
    /// identity is stable across devices that generated independent ids for
    /// the same looked-up word. Optional fields are only overlaid when the
    /// incoming record actually carries a value.
    pub fn overlay_onto(existing: &Card, incoming: &Card) -> Card {
        Card {
            id: existing.id,
            word: incoming.word.clone(),
            phonetic: incoming
                .phonetic
                .clone()
                .or_else(|| existing.phonetic.clone()),
            main_definition: incoming.main_definition.clone(),
            example: incoming.example.clone().or_else(|| existing.example.clone()),
            part_of_speech: incoming.part_of_speech.clone(),
            status: incoming.status,
            last_reviewed: incoming.last_reviewed,
            created_at: incoming.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(word: &str, definition: &str) -> Card {
        Card::new(word, None, definition, None, "noun", 1_000)
    }

    #[test]
    fn new_card_defaults() {
        let c = card("lumen", "unit of light");
        assert_eq!(c.status, CardStatus::New);
        assert_eq!(c.last_reviewed, 0);
        assert_eq!(c.created_at, 1_000);
    }

    #[test]
    fn content_key_folds_word_only() {
        let a = card("Cat", "animal");
        let b = card("cat", "animal");
        let c = card("cat", "Animal");

        assert!(a.same_content(&b));
        assert!(!a.same_content(&c));
    }

    #[test]
    fn overlay_keeps_existing_id() {
        let existing = card("cat", "animal");
        let mut incoming = card("Cat", "animal");
        incoming.status = CardStatus::Mastered;
        incoming.last_reviewed = 99;

        let merged = Card::overlay_onto(&existing, &incoming);
        assert_eq!(merged.id, existing.id);
        assert_eq!(merged.word, "Cat");
        assert_eq!(merged.status, CardStatus::Mastered);
        assert_eq!(merged.last_reviewed, 99);
    }

    #[test]
    fn overlay_keeps_existing_optionals_when_incoming_absent() {
        let mut existing = card("cat", "animal");
        existing.phonetic = Some("/kat/".to_string());
        existing.example = Some("the cat sat".to_string());
        let incoming = card("cat", "animal");

        let merged = Card::overlay_onto(&existing, &incoming);
        assert_eq!(merged.phonetic.as_deref(), Some("/kat/"));
        assert_eq!(merged.example.as_deref(), Some("the cat sat"));
    }

    #[test]
    fn status_wire_round_trip_and_fallback() {
        assert_eq!(CardStatus::from_wire("Learning"), CardStatus::Learning);
        assert_eq!(CardStatus::from_wire("Mastered"), CardStatus::Mastered);
        assert_eq!(CardStatus::from_wire(""), CardStatus::New);
        assert_eq!(CardStatus::from_wire("mastered"), CardStatus::New);
    }

    #[test]
    fn card_serializes_camel_case() {
        let c = card("lumen", "unit of light");
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("mainDefinition").is_some());
        assert!(json.get("partOfSpeech").is_some());
        assert!(json.get("lastReviewed").is_some());
        assert!(json.get("createdAt").is_some());
        // absent optionals are omitted, matching records written elsewhere
        assert!(json.get("phonetic").is_none());
    }

    #[test]
    fn card_round_trips_through_stored_json() {
        // Records written by earlier clients carry exactly these keys.
        let stored = serde_json::json!({
            "id": "c56a4180-65aa-42ec-a945-5fd21dec0538",
            "word": "lumen",
            "mainDefinition": "a unit of luminous flux",
            "partOfSpeech": "noun",
            "status": "Learning",
            "createdAt": 1_700_000_000_000_i64
        });

        let parsed: Card = serde_json::from_value(stored).unwrap();
        assert_eq!(parsed.word, "lumen");
        assert_eq!(parsed.main_definition, "a unit of luminous flux");
        assert_eq!(parsed.status, CardStatus::Learning);
        assert_eq!(parsed.last_reviewed, 0);

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back.get("mainDefinition").unwrap(), "a unit of luminous flux");
    }

    #[test]
    fn same_content_folds_case_beyond_ascii() {
        let a = card("Über", "German: above");
        let b = card("über", "German: above");
        assert!(a.same_content(&b));
        assert_eq!(a.content_key(), b.content_key());
    }
}
