//! List sharing: invitations and membership grants.

use serde_json::json;
use std::sync::Arc;

use trolley_collab::{add_member, resolve_owner, ListInvite};
use trolley_core::{ListMember, MemberRole, ShoppingList, UserRef};
use trolley_store::{
    from_document, invites_collection, to_document, DocumentStore, Filter, ListPath, StoreError,
    WriteBatch,
};

use crate::error::ServiceError;

/// Invitation lifecycle over the document store.
///
/// Overlapping calls for the same invite are not serialized here; a
/// duplicate accept surfaces `NotFound`, which callers treat as
/// already-handled.
pub struct SharingService {
    store: Arc<dyn DocumentStore>,
}

impl SharingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a pending invitation. The recipient email is not verified
    /// against an existing account; acceptance is keyed by email match
    /// at acceptance time.
    pub fn invite(
        &self,
        list: &ShoppingList,
        from_user: &UserRef,
        to_email: &str,
    ) -> Result<String, ServiceError> {
        let from_email = from_user
            .email
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("user does not have an email address".into()))?;
        // The list must have a resolvable owner before it can be shared;
        // acceptance writes into that partition.
        resolve_owner(list)?;

        let invite = ListInvite::new(list, &from_user.uid, from_email, to_email);
        self.store
            .set(&invites_collection().doc(&invite.id), to_document(&invite)?)?;
        tracing::info!(list = %list.id, invite = %invite.id, "invitation sent");
        Ok(invite.id)
    }

    /// Pending invitations addressed to the user's email, compared exactly
    /// as stored. A user without an email has no invitations.
    pub fn invites_for(&self, user: &UserRef) -> Result<Vec<ListInvite>, ServiceError> {
        let Some(email) = user.email.as_deref() else {
            return Ok(Vec::new());
        };
        let filter = Filter::FieldEq("toEmail".into(), json!(email));
        Ok(self
            .store
            .list(&invites_collection(), Some(&filter))?
            .into_iter()
            .map(|(_, doc)| from_document::<ListInvite>(doc))
            .collect::<Result<Vec<_>, StoreError>>()?)
    }

    /// Accept an invitation: grant editor membership and consume the invite
    /// in one atomic batch, so neither effect can apply without the other.
    pub fn accept(&self, invite: &ListInvite, user: &UserRef) -> Result<(), ServiceError> {
        let email = user
            .email
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("user does not have an email address".into()))?;

        // A consumed invite means a duplicate accept; callers swallow the
        // NotFound as already-handled.
        if self.store.get(&invites_collection().doc(&invite.id))?.is_none() {
            return Err(ServiceError::NotFound("invitation no longer exists".into()));
        }

        let invited_path = ListPath::new(&invite.from_uid, &invite.list_id).doc();
        let doc = self
            .store
            .get(&invited_path)?
            .ok_or_else(|| ServiceError::NotFound("list does not exist".into()))?;
        let mut list: ShoppingList = from_document(doc)?;

        // Membership lives on the owner's copy of the list document.
        let owner = resolve_owner(&list)?.clone();
        let list_path = ListPath::new(owner, &list.id).doc();

        add_member(
            &mut list,
            ListMember {
                uid: user.uid.clone(),
                email: email.to_string(),
                role: MemberRole::Editor,
            },
        );

        let mut batch = WriteBatch::new();
        batch.merge(
            list_path,
            json!({
                "members": to_document(&list.members)?,
                "memberUids": to_document(&list.member_uids)?,
            }),
        );
        batch.delete(invites_collection().doc(&invite.id));
        self.store.commit(batch)?;

        tracing::info!(list = %list.id, invite = %invite.id, uid = %user.uid, "invitation accepted");
        Ok(())
    }

    /// Decline an invitation: delete the invite record only.
    pub fn decline(&self, invite: &ListInvite) -> Result<(), ServiceError> {
        self.store.delete(&invites_collection().doc(&invite.id))?;
        tracing::debug!(invite = %invite.id, "invitation declined");
        Ok(())
    }
}
