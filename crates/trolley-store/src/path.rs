//! Document paths.
//!
//! The store layout mirrors the hosted database:
//! `users/{owner_uid}/lists/{list_id}` for list documents, with the list's
//! content in subcollections below it, plus one global `list-invites`
//! collection. All content paths are rooted at the *owner's* uid — a shared
//! list's data lives in the owner's partition no matter which member acts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A collection of documents, addressed by slash-joined segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// A document within this collection.
    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The collection's own name (last path segment), used for
    /// collection-group queries across all partitions.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single document within a collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocPath {
    pub collection: CollectionPath,
    pub id: String,
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// The global collection of pending list invitations.
pub fn invites_collection() -> CollectionPath {
    CollectionPath::new("list-invites")
}

/// Path builder for one list's document and subcollections, rooted at the
/// owner's partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPath {
    pub owner_uid: String,
    pub list_id: String,
}

impl ListPath {
    pub fn new(owner_uid: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self {
            owner_uid: owner_uid.into(),
            list_id: list_id.into(),
        }
    }

    /// The `lists` collection of one user's partition.
    pub fn lists_of(owner_uid: &str) -> CollectionPath {
        CollectionPath::new(format!("users/{}/lists", owner_uid))
    }

    /// The list document itself.
    pub fn doc(&self) -> DocPath {
        Self::lists_of(&self.owner_uid).doc(&self.list_id)
    }

    fn sub(&self, name: &str) -> CollectionPath {
        CollectionPath::new(format!(
            "users/{}/lists/{}/{}",
            self.owner_uid, self.list_id, name
        ))
    }

    pub fn categories(&self) -> CollectionPath {
        self.sub("categories")
    }

    pub fn items(&self) -> CollectionPath {
        self.sub("items")
    }

    pub fn held_items(&self) -> CollectionPath {
        self.sub("heldItems")
    }

    pub fn suggestions(&self) -> CollectionPath {
        self.sub("suggestions")
    }

    pub fn backups(&self) -> CollectionPath {
        self.sub("backups")
    }
}
