//! Membership updates.
//!
//! `member_uids` is a derived index over the `members` map, kept
//! denormalized for membership-containment queries. Both fields must change
//! together, so mutation goes through these two functions and nowhere else;
//! callers persist the resulting list document in the same atomic batch as
//! any related writes.

use trolley_core::{ListMember, ShoppingList};

fn sync_member_uids(list: &mut ShoppingList) {
    list.member_uids = list.members.keys().cloned().collect();
}

/// Add or replace a member and recompute the uid index.
pub fn add_member(list: &mut ShoppingList, member: ListMember) {
    list.members.insert(member.uid.clone(), member);
    sync_member_uids(list);
}

/// Remove a member and recompute the uid index.
pub fn remove_member(list: &mut ShoppingList, uid: &str) {
    list.members.remove(uid);
    sync_member_uids(list);
}
