//! Card Identity & Merge Engine
//!
//! Merges card batches arriving from independent sources (snapshot, seed,
//! cloud pull, imported file, extension writes) into one deduplicated
//! collection. Pure and infallible: malformed records are dropped by the
//! codecs before ever reaching this module.
//!
//! The merge is deliberately not commutative. Incoming fields overwrite
//! existing fields, but the surviving `id` is always the one already present
//! before the call, so identity stays stable across devices that assigned
//! independent ids to the same looked-up word.

use std::collections::HashMap;

use crate::models::{Card, CardId};

/// Merge `incoming` into `canonical`, returning the new canonical
/// collection sorted by `created_at` descending.
///
/// Per incoming card:
/// - a content-key match against the accumulating collection overlays the
///   incoming fields onto the matched card, keeping the matched `id`;
/// - otherwise the card is upserted by `id` (full replacement on an id hit,
///   insertion on a miss).
///
/// Duplicate content keys within `incoming` itself resolve last-one-wins,
/// because each card merges sequentially against the accumulating state.
/// Empty `incoming` is a no-op apart from ordering normalization.
pub fn merge(canonical: &[Card], incoming: impl IntoIterator<Item = Card>) -> Vec<Card> {
    let mut by_id: HashMap<CardId, Card> = canonical
        .iter()
        .map(|card| (card.id, card.clone()))
        .collect();

    for card in incoming {
        // Linear scan by design: decks are small. The id index above only
        // serves the upsert branch.
        let matched = by_id
            .values()
            .find(|existing| existing.same_content(&card))
            .map(|existing| existing.id);

        match matched {
            Some(id) => {
                let overlaid = Card::overlay_onto(&by_id[&id], &card);
                by_id.insert(id, overlaid);
            }
            None => {
                by_id.insert(card.id, card);
            }
        }
    }

    sorted(by_id.into_values().collect())
}

/// Canonical ordering: `created_at` descending, id ascending as a
/// deterministic tiebreak.
pub fn sorted(mut cards: Vec<Card>) -> Vec<Card> {
    cards.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardStatus;

    fn card_at(word: &str, definition: &str, created_at: i64) -> Card {
        let mut c = Card::new(word, None, definition, None, "noun", created_at);
        c.created_at = created_at;
        c
    }

    #[test]
    fn empty_incoming_normalizes_ordering_only() {
        let canonical = vec![card_at("a", "1", 10), card_at("b", "2", 20)];
        let merged = merge(&canonical, []);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].word, "b");
        assert_eq!(merged[1].word, "a");
    }

    #[test]
    fn seed_into_empty_canonical() {
        let seed = vec![card_at("lumen", "unit of light", 5)];
        let merged = merge(&[], seed.clone());

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].word, "lumen");
    }

    #[test]
    fn content_key_match_keeps_canonical_id() {
        let existing = card_at("Cat", "animal", 10);
        let existing_id = existing.id;

        // Same content under a different id, as a second device would
        // produce for the same looked-up word.
        let mut remote = card_at("cat", "animal", 30);
        remote.status = CardStatus::Learning;

        let merged = merge(&[existing], vec![remote]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, existing_id);
        assert_eq!(merged[0].word, "cat");
        assert_eq!(merged[0].status, CardStatus::Learning);
        assert_eq!(merged[0].created_at, 30);
    }

    #[test]
    fn case_folding_collapses_non_ascii_duplicates() {
        let existing = card_at("Über", "German: above", 10);
        let existing_id = existing.id;
        let remote = card_at("über", "German: above", 30);

        let merged = merge(&[existing], vec![remote]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, existing_id);
    }

    #[test]
    fn distinct_definitions_stay_distinct_cards() {
        let existing = card_at("bank", "financial institution", 10);
        let incoming = card_at("bank", "edge of a river", 20);

        let merged = merge(&[existing], vec![incoming]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn id_hit_without_content_match_replaces_record() {
        let existing = card_at("old", "old definition", 10);
        let mut incoming = card_at("new", "new definition", 20);
        incoming.id = existing.id;

        let merged = merge(&[existing], vec![incoming]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].word, "new");
        assert_eq!(merged[0].main_definition, "new definition");
    }

    #[test]
    fn in_batch_duplicates_resolve_last_one_wins() {
        let mut first = card_at("echo", "repetition of sound", 10);
        first.status = CardStatus::Learning;
        let mut second = card_at("Echo", "repetition of sound", 20);
        second.status = CardStatus::Mastered;
        let first_id = first.id;

        let merged = merge(&[], vec![first, second]);

        assert_eq!(merged.len(), 1);
        // The first-applied card became canonical, so its id survives the
        // second card's overlay.
        assert_eq!(merged[0].id, first_id);
        assert_eq!(merged[0].word, "Echo");
        assert_eq!(merged[0].status, CardStatus::Mastered);
    }

    #[test]
    fn re_merge_of_same_batch_is_idempotent() {
        let canonical = vec![card_at("a", "1", 10), card_at("b", "2", 20)];
        let batch = vec![card_at("b", "2", 25), card_at("c", "3", 30)];

        let once = merge(&canonical, batch.clone());
        let twice = merge(&once, batch);

        assert_eq!(once, twice);
    }

    #[test]
    fn output_sorted_newest_first() {
        let merged = merge(
            &[],
            vec![
                card_at("a", "1", 10),
                card_at("b", "2", 30),
                card_at("c", "3", 20),
            ],
        );

        let words: Vec<&str> = merged.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["b", "c", "a"]);
    }

    #[test]
    fn equal_timestamps_sort_deterministically() {
        let a = card_at("a", "1", 10);
        let b = card_at("b", "2", 10);

        let forward = merge(&[], vec![a.clone(), b.clone()]);
        let reverse = merge(&[], vec![b, a]);

        assert_eq!(forward, reverse);
    }
}
