use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shopping-list item, belonging to exactly one category within one list.
///
/// `quantity` is the free-form token extracted from user input ("3", "2kg");
/// display text is already capitalized and emoji-annotated by the service
/// before an `Item` is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create a new, not-done item with a fresh id.
    pub fn new(text: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            done: false,
            category_id: category_id.into(),
            quantity: None,
            created_at: Utc::now(),
        }
    }

    /// Attach a quantity token.
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Park this item outside the active shopping flow.
    pub fn hold(self) -> HeldItem {
        HeldItem {
            id: self.id,
            text: self.text,
            category_id: self.category_id,
            quantity: self.quantity,
            created_at: self.created_at,
        }
    }
}

/// An item temporarily removed from the active shopping flow.
///
/// Structurally an [`Item`] minus `done`; it keeps its id and creation time
/// so unholding restores the original ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeldItem {
    pub id: String,
    pub text: String,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HeldItem {
    /// Return the item to the active flow, under the given category.
    ///
    /// The restored item is never done, regardless of its state when held.
    pub fn unhold(self, category_id: impl Into<String>) -> Item {
        Item {
            id: self.id,
            text: self.text,
            done: false,
            category_id: category_id.into(),
            quantity: self.quantity,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_unhold_round_trip_keeps_identity() {
        let item = Item::new("🥛 Milk", "dairy").with_quantity("2");
        let id = item.id.clone();
        let created = item.created_at;

        let held = item.hold();
        assert_eq!(held.id, id);
        assert_eq!(held.created_at, created);

        let back = held.unhold("beverages");
        assert_eq!(back.id, id);
        assert_eq!(back.created_at, created);
        assert_eq!(back.category_id, "beverages");
        assert!(!back.done);
        assert_eq!(back.quantity.as_deref(), Some("2"));
    }

    #[test]
    fn item_serde_round_trip() {
        let item = Item::new("🍞 Bread", "bakery");
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn done_defaults_to_false_when_absent() {
        // Items written before the done flag existed deserialize cleanly.
        let json = r#"{"id":"a","text":"Bread","categoryId":"c1","createdAt":"2024-01-01T00:00:00Z"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(!item.done);
        assert!(item.quantity.is_none());
    }
}
