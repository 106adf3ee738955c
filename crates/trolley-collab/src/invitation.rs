//! List invitation records.

use serde::{Deserialize, Serialize};
use trolley_core::{ShoppingList, Uid};

/// A pending invitation to join a shared list.
///
/// Created by the sharing service; deleted on accept (after membership has
/// been granted, in the same batch) or on decline. Acceptance is keyed by
/// email match at acceptance time, so `to_email` is not verified against an
/// existing account when the invite is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvite {
    pub id: String,
    pub list_id: String,
    pub list_name: String,
    pub from_uid: Uid,
    pub from_email: String,
    pub to_email: String,
}

impl ListInvite {
    /// Create a pending invitation with a fresh id.
    pub fn new(
        list: &ShoppingList,
        from_uid: impl Into<Uid>,
        from_email: impl Into<String>,
        to_email: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            list_id: list.id.clone(),
            list_name: list.name.clone(),
            from_uid: from_uid.into(),
            from_email: from_email.into(),
            to_email: to_email.into(),
        }
    }
}
