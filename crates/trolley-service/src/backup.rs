//! Backup snapshot and restore.
//!
//! Backups are append-only documents under the owner partition; the
//! debounced scheduling of automatic snapshots belongs to the caller.

use chrono::Utc;

use trolley_core::{Backup, ShoppingList};
use trolley_store::{from_document, to_document, StoreError, WriteBatch};

use crate::error::ServiceError;
use crate::lists::ListService;

impl ListService {
    /// Write a snapshot of the list's live collections. Returns the backup
    /// and its document id.
    pub fn snapshot(&self, list: &ShoppingList) -> Result<(String, Backup), ServiceError> {
        let path = self.path_for(list)?;
        let backup = Backup::snapshot(
            Utc::now(),
            self.read_categories(&path)?,
            self.read_items(&path)?,
            self.read_held_items(&path)?,
            self.read_suggestions(&path)?,
        );

        let id = uuid::Uuid::new_v4().to_string();
        self.store()
            .set(&path.backups().doc(&id), to_document(&backup)?)?;
        tracing::debug!(list = %list.id, backup = %id, "backup written");
        Ok((id, backup))
    }

    /// All backups of the list, newest first.
    pub fn backups(&self, list: &ShoppingList) -> Result<Vec<(String, Backup)>, ServiceError> {
        let path = self.path_for(list)?;
        let mut backups = self
            .store()
            .list(&path.backups(), None)?
            .into_iter()
            .map(|(id, doc)| Ok((id, from_document::<Backup>(doc)?)))
            .collect::<Result<Vec<_>, StoreError>>()?;
        backups.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(backups)
    }

    /// Overwrite the live collections with a backup's content, in one batch.
    /// The backup document itself is left in place.
    pub fn restore(&self, list: &ShoppingList, backup_id: &str) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let backup: Backup = from_document(
            self.store()
                .get(&path.backups().doc(backup_id))?
                .ok_or_else(|| ServiceError::NotFound(format!("backup {}", backup_id)))?,
        )?;

        let mut batch = WriteBatch::new();
        for collection in [
            path.categories(),
            path.items(),
            path.held_items(),
            path.suggestions(),
        ] {
            for (id, _) in self.store().list(&collection, None)? {
                batch.delete(collection.doc(id));
            }
        }
        for category in &backup.categories {
            batch.set(path.categories().doc(&category.id), to_document(category)?);
        }
        for item in &backup.items {
            batch.set(path.items().doc(&item.id), to_document(item)?);
        }
        for held in &backup.held_items {
            batch.set(path.held_items().doc(&held.id), to_document(held)?);
        }
        for (key, suggestion) in &backup.suggestions {
            batch.set(path.suggestions().doc(key), to_document(suggestion)?);
        }
        self.store().commit(batch)?;
        tracing::info!(list = %list.id, backup = %backup_id, "backup restored");
        Ok(())
    }
}
