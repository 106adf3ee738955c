//! Collaboration infrastructure for shared shopping lists.
//!
//! Provides the ownership resolver that routes all list content to the
//! owner's storage partition, the single membership-update entry point that
//! keeps the denormalized `member_uids` index in sync, and the invitation
//! record used to share a list.

pub mod invitation;
pub mod membership;
pub mod ownership;

pub use invitation::ListInvite;
pub use membership::{add_member, remove_member};
pub use ownership::{resolve_owner, OwnershipError};
