//! Ownership resolution for shared lists.
//!
//! Every subcollection of a list (categories, items, held items,
//! suggestions, backups) is stored under the owner's partition, so every
//! read or write must resolve the owner first. Exactly one member holds the
//! owner role; zero or several is an invariant violation and aborts the
//! operation before any write is attempted.

use thiserror::Error;
use trolley_core::{MemberRole, ShoppingList, Uid};

/// Errors from ownership resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnershipError {
    /// The membership map has no owner
    #[error("list {0} has no owner")]
    NoOwner(String),

    /// The membership map has more than one owner
    #[error("list {0} has multiple owners")]
    MultipleOwners(String),
}

/// Return the uid of the list's single owner.
pub fn resolve_owner(list: &ShoppingList) -> Result<&Uid, OwnershipError> {
    let mut owners = list
        .members
        .values()
        .filter(|member| member.role == MemberRole::Owner);

    match (owners.next(), owners.next()) {
        (Some(owner), None) => Ok(&owner.uid),
        (None, _) => Err(OwnershipError::NoOwner(list.id.clone())),
        (Some(_), Some(_)) => Err(OwnershipError::MultipleOwners(list.id.clone())),
    }
}
