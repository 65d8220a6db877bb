//! Raw response shapes of the external dictionary API

use core_deck::{Definition, Meaning, WordEntry};
use serde::Deserialize;

/// One entry as returned by the dictionary API. The API returns a list of
/// these per word; only the first is used.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<RawPhonetic>,
    #[serde(default)]
    pub meanings: Vec<RawMeaning>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhonetic {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeaning {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<RawDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDefinition {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}

impl RawEntry {
    /// Flatten into the structured entry the deck consumes.
    ///
    /// The top-level `phonetic` field is frequently absent; fall back to the
    /// first phonetics list item carrying text.
    pub fn into_entry(self) -> WordEntry {
        let phonetic = self.phonetic.or_else(|| {
            self.phonetics
                .into_iter()
                .find_map(|candidate| candidate.text.filter(|text| !text.is_empty()))
        });

        WordEntry {
            word: self.word,
            phonetic,
            meanings: self
                .meanings
                .into_iter()
                .map(|meaning| Meaning {
                    part_of_speech: meaning.part_of_speech,
                    definitions: meaning
                        .definitions
                        .into_iter()
                        .map(|definition| Definition {
                            definition: definition.definition,
                            example: definition.example,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// One suggestion as returned by the autocomplete API.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionItem {
    pub word: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phonetic_falls_back_to_phonetics_list() {
        let raw: RawEntry = serde_json::from_str(
            r#"{
                "word": "lumen",
                "phonetics": [{"audio": "x.mp3"}, {"text": "/ˈluː.mən/"}],
                "meanings": []
            }"#,
        )
        .unwrap();

        let entry = raw.into_entry();
        assert_eq!(entry.phonetic.as_deref(), Some("/ˈluː.mən/"));
    }

    #[test]
    fn top_level_phonetic_wins() {
        let raw: RawEntry = serde_json::from_str(
            r#"{"word": "lumen", "phonetic": "/top/", "phonetics": [{"text": "/list/"}]}"#,
        )
        .unwrap();

        assert_eq!(raw.into_entry().phonetic.as_deref(), Some("/top/"));
    }
}
