//! Dictionary entry types
//!
//! The shape returned by the external definition-lookup collaborator and
//! consumed by the lookup-to-deck action.

use serde::{Deserialize, Serialize};

use crate::models::Card;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    pub definitions: Vec<Definition>,
}

/// A structured dictionary entry for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub meanings: Vec<Meaning>,
}

impl Card {
    /// Build a fresh card from a dictionary entry and the definition the
    /// user picked out of it.
    pub fn from_selection(
        entry: &WordEntry,
        definition: impl Into<String>,
        example: Option<String>,
        part_of_speech: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Card::new(
            entry.word.clone(),
            entry.phonetic.clone(),
            definition,
            example,
            part_of_speech,
            now_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardStatus;

    #[test]
    fn card_from_selection_carries_entry_fields() {
        let entry = WordEntry {
            word: "lumen".to_string(),
            phonetic: Some("/ˈluːmən/".to_string()),
            meanings: vec![Meaning {
                part_of_speech: "noun".to_string(),
                definitions: vec![Definition {
                    definition: "the SI unit of luminous flux".to_string(),
                    example: None,
                }],
            }],
        };

        let card = Card::from_selection(
            &entry,
            "the SI unit of luminous flux",
            None,
            "noun",
            123,
        );

        assert_eq!(card.word, "lumen");
        assert_eq!(card.phonetic.as_deref(), Some("/ˈluːmən/"));
        assert_eq!(card.status, CardStatus::New);
        assert_eq!(card.created_at, 123);
    }
}
