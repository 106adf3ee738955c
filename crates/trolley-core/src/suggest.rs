//! Frequency/recency ranking of historical item suggestions.
//!
//! Suggestions are keyed by normalized item text and scored by how often and
//! how recently an item was added. Ranking is a pure function over its
//! inputs plus an injected clock; it never fails, it just returns fewer (or
//! no) suggestions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::emoji::strip_leading_emoji;
use crate::item::Item;

/// How many suggestions the ranked view shows.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 50;

/// A historical entry-frequency record for one normalized item text.
///
/// `frequency` is at least 1 and only decreases on explicit deletion or a
/// key migration that overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub text: String,
    pub frequency: u32,
    pub last_added: DateTime<Utc>,
    pub category_id: String,
}

/// A suggestion annotated with its map key and ranking score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSuggestion {
    pub key: String,
    pub text: String,
    pub frequency: u32,
    pub last_added: DateTime<Utc>,
    pub category_id: String,
    pub score: f64,
}

/// The suggestion-map key for an item text: trimmed, leading emoji stripped,
/// lowercased.
pub fn normalized_key(text: &str) -> String {
    strip_leading_emoji(text.trim()).to_lowercase()
}

/// Score = frequency * 2 + recency, where recency decays linearly from 10 to
/// zero over ten days. Frequency dominates for well-established items.
fn score(suggestion: &Suggestion, now: DateTime<Utc>) -> f64 {
    let days_since = (now - suggestion.last_added).num_milliseconds() as f64 / 86_400_000.0;
    let recency = (10.0 - days_since).max(0.0);
    suggestion.frequency as f64 * 2.0 + recency
}

/// Rank suggestions for display.
///
/// Items already on the list are excluded (matched by both their raw
/// lowercased text and their emoji-stripped lowercased text, to catch items
/// written before annotation existed). With a search term, only suggestions
/// where some whitespace-delimited word of the text starts with the term are
/// kept. Ties in score break by key, ascending.
pub fn rank(
    suggestions: &BTreeMap<String, Suggestion>,
    active_items: &[Item],
    now: DateTime<Utc>,
    search_term: Option<&str>,
    limit: usize,
) -> Vec<RankedSuggestion> {
    let mut on_list: HashSet<String> = HashSet::new();
    for item in active_items {
        on_list.insert(item.text.to_lowercase());
        on_list.insert(normalized_key(&item.text));
    }

    let term = search_term
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let mut ranked: Vec<RankedSuggestion> = suggestions
        .iter()
        .filter(|(key, _)| !on_list.contains(key.as_str()))
        .filter(|(_, s)| match &term {
            Some(term) => s
                .text
                .to_lowercase()
                .split_whitespace()
                .any(|word| word.starts_with(term.as_str())),
            None => true,
        })
        .map(|(key, s)| RankedSuggestion {
            key: key.clone(),
            text: s.text.clone(),
            frequency: s.frequency,
            last_added: s.last_added,
            category_id: s.category_id.clone(),
            score: score(s, now),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });

    ranked.truncate(limit);
    ranked
}
