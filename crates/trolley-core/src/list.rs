use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User identifier, as issued by the identity provider.
pub type Uid = String;

/// Role a member holds on a shared list.
///
/// Exactly one member of a list holds `Owner`; the ownership resolver in
/// `trolley-collab` checks that invariant rather than assuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Editor,
    Viewer,
}

/// A member of a shared list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMember {
    pub uid: Uid,
    pub email: String,
    pub role: MemberRole,
}

/// A signed-in user as seen by the services.
///
/// The identity provider does not guarantee an email address, so operations
/// that key on it (sharing) validate its presence explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub uid: Uid,
    pub email: Option<String>,
}

impl UserRef {
    pub fn new(uid: impl Into<Uid>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
        }
    }
}

/// A shopping list and its membership.
///
/// `member_uids` is a derived index of `members` keys, denormalized for
/// membership-containment queries. Only the membership functions in
/// `trolley-collab` may recompute it; nothing else writes both fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_opened: DateTime<Utc>,
    #[serde(default)]
    pub members: BTreeMap<Uid, ListMember>,
    #[serde(default)]
    pub member_uids: Vec<Uid>,
}

impl ShoppingList {
    /// Create a list with the given user as its sole owner.
    pub fn new(name: impl Into<String>, owner_uid: impl Into<Uid>, owner_email: impl Into<String>) -> Self {
        let uid = owner_uid.into();
        let now = Utc::now();
        let mut members = BTreeMap::new();
        members.insert(
            uid.clone(),
            ListMember {
                uid: uid.clone(),
                email: owner_email.into(),
                role: MemberRole::Owner,
            },
        );
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            last_opened: now,
            members,
            member_uids: vec![uid],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_has_single_owner() {
        let list = ShoppingList::new("Groceries", "u1", "u1@example.com");
        assert_eq!(list.member_uids, vec!["u1".to_string()]);
        assert_eq!(list.members["u1"].role, MemberRole::Owner);
        assert_eq!(list.members["u1"].email, "u1@example.com");
    }

    #[test]
    fn list_serde_round_trip() {
        let list = ShoppingList::new("Groceries", "u1", "u1@example.com");
        let json = serde_json::to_string(&list).unwrap();
        let back: ShoppingList = serde_json::from_str(&json).unwrap();
        assert_eq!(list, back);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MemberRole::Owner).unwrap(), "\"owner\"");
        assert_eq!(serde_json::to_string(&MemberRole::Editor).unwrap(), "\"editor\"");
    }
}
