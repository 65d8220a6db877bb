//! Tabular deck format
//!
//! The export/import wire format used by the file sink and manual
//! import/export. Column order is fixed:
//!
//! `ID, Word, Phonetic, Definition, Example, Part of Speech, Status,
//! Last Reviewed, Created At`
//!
//! A field is quoted iff it contains a comma, double-quote, or newline;
//! embedded quotes are doubled. The parser is quote-aware across record
//! boundaries, so definitions and examples may carry embedded newlines.

use tracing::warn;

use crate::models::{Card, CardId, CardStatus};

const HEADER: &str =
    "ID,Word,Phonetic,Definition,Example,Part of Speech,Status,Last Reviewed,Created At";

/// Minimum parsed fields for a row to be considered well-formed.
const MIN_FIELDS: usize = 7;

/// Serialize the deck to tabular text, header row included.
pub fn generate_deck(cards: &[Card]) -> String {
    let mut out = String::from(HEADER);

    for card in cards {
        let fields = [
            card.id.to_string(),
            card.word.clone(),
            card.phonetic.clone().unwrap_or_default(),
            card.main_definition.clone(),
            card.example.clone().unwrap_or_default(),
            card.part_of_speech.clone(),
            card.status.as_wire_str().to_string(),
            card.last_reviewed.to_string(),
            card.created_at.to_string(),
        ];

        out.push('\n');
        let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&row.join(","));
    }

    out
}

/// Parse tabular text into cards.
///
/// The header row is skipped. Malformed rows (fewer than seven fields after
/// quote-aware splitting) are skipped individually; the rest of the batch
/// continues. A missing ID gets a fresh identifier, an absent or
/// unrecognized status falls back to `New`, an absent `Last Reviewed`
/// defaults to 0, and an absent `Created At` defaults to `now_ms` (injected
/// so parses stay deterministic under test).
pub fn parse_deck(text: &str, now_ms: i64) -> Vec<Card> {
    let mut cards = Vec::new();

    for (index, fields) in split_records(text).into_iter().enumerate() {
        // Header row.
        if index == 0 {
            continue;
        }

        if fields.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        if fields.len() < MIN_FIELDS {
            warn!(
                row = index,
                fields = fields.len(),
                "Skipping malformed deck row"
            );
            continue;
        }

        cards.push(row_to_card(&fields, now_ms));
    }

    cards
}

fn row_to_card(fields: &[String], now_ms: i64) -> Card {
    // Keep the existing id when it parses so re-imports don't duplicate;
    // anything unusable gets a fresh identifier (content-key dedup still
    // collapses such rows against existing cards on merge).
    let id = fields
        .first()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .and_then(|s| CardId::from_string(s).ok())
        .unwrap_or_default();

    let optional = |s: &String| {
        if s.is_empty() {
            None
        } else {
            Some(s.clone())
        }
    };

    Card {
        id,
        word: fields[1].clone(),
        phonetic: optional(&fields[2]),
        main_definition: fields[3].clone(),
        example: optional(&fields[4]),
        part_of_speech: fields[5].clone(),
        status: CardStatus::from_wire(&fields[6]),
        last_reviewed: fields
            .get(7)
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0),
        created_at: fields
            .get(8)
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(now_ms),
    }
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Quote-aware record splitter.
///
/// Commas and newlines inside quoted fields are literal; a doubled quote
/// inside a quoted field is a literal quote. Accepts `\r\n` and `\n` record
/// separators.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut started = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        started = true;
        match ch {
            '"' => {
                if in_quote && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quote = !in_quote;
                }
            }
            ',' if !in_quote => {
                fields.push(std::mem::take(&mut current));
            }
            '\r' if !in_quote && chars.peek() == Some(&'\n') => {
                chars.next();
                fields.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut fields));
            }
            '\n' if !in_quote => {
                fields.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut fields));
            }
            _ => current.push(ch),
        }
    }

    if started && (!current.is_empty() || !fields.is_empty()) {
        fields.push(current);
        records.push(fields);
    }

    records
}
