use serde::{Deserialize, Serialize};

/// A user-defined category grouping items within a list.
///
/// `order` is a dense integer controlling display sequence; reordering
/// rewrites every order so the sequence stays contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub order: u32,
}

impl Category {
    /// Create a new category with a fresh id at the given position.
    pub fn new(name: impl Into<String>, color: impl Into<String>, order: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            order,
        }
    }
}
