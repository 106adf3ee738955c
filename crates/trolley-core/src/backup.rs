use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::Category;
use crate::item::{HeldItem, Item};
use crate::suggest::Suggestion;

/// An immutable point-in-time snapshot of a list's full content.
///
/// Backups are append-only; restoring one overwrites the live collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub created_at: DateTime<Utc>,
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
    pub held_items: Vec<HeldItem>,
    pub suggestions: BTreeMap<String, Suggestion>,
}

impl Backup {
    /// Snapshot the given live collections at `now`.
    pub fn snapshot(
        now: DateTime<Utc>,
        categories: Vec<Category>,
        items: Vec<Item>,
        held_items: Vec<HeldItem>,
        suggestions: BTreeMap<String, Suggestion>,
    ) -> Self {
        Self {
            created_at: now,
            categories,
            items,
            held_items,
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_serde_round_trip() {
        let now = Utc::now();
        let backup = Backup::snapshot(
            now,
            vec![Category::new("Produce", "#4caf50", 0)],
            vec![Item::new("🍎 Apples", "c1")],
            vec![],
            BTreeMap::new(),
        );
        let json = serde_json::to_string(&backup).unwrap();
        let back: Backup = serde_json::from_str(&json).unwrap();
        assert_eq!(backup, back);
    }
}
