//! List content operations: items, held items, categories, suggestions.

use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

use trolley_collab::resolve_owner;
use trolley_core::{
    annotate, capitalize_first, normalized_key, parse_item_text, rank, Category, HeldItem, Item,
    RankedSuggestion, ShoppingList, Suggestion, UserRef, DEFAULT_SUGGESTION_LIMIT,
};
use trolley_store::{
    from_document, to_document, DocumentStore, Filter, ListPath, StoreError, WriteBatch,
};

use crate::error::ServiceError;

/// A failed optimistic toggle.
///
/// The rendering layer applies the tentative state immediately; on failure
/// it reverts to `previous` rather than guessing.
#[derive(Debug, Error)]
#[error("toggle failed, revert to previous state")]
pub struct ToggleRevert {
    pub previous: Item,
    #[source]
    pub source: ServiceError,
}

/// Operations over one list's content, routed through the owner partition.
pub struct ListService {
    store: Arc<dyn DocumentStore>,
}

impl ListService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Resolve the owner and build the list's storage paths.
    pub(crate) fn path_for(&self, list: &ShoppingList) -> Result<ListPath, ServiceError> {
        let owner = resolve_owner(list)?;
        Ok(ListPath::new(owner, &list.id))
    }

    pub(crate) fn read_items(&self, path: &ListPath) -> Result<Vec<Item>, ServiceError> {
        let mut items = self
            .store
            .list(&path.items(), None)?
            .into_iter()
            .map(|(_, doc)| from_document::<Item>(doc))
            .collect::<Result<Vec<_>, StoreError>>()?;
        items.sort_by_key(|item| item.created_at);
        Ok(items)
    }

    pub(crate) fn read_held_items(&self, path: &ListPath) -> Result<Vec<HeldItem>, ServiceError> {
        Ok(self
            .store
            .list(&path.held_items(), None)?
            .into_iter()
            .map(|(_, doc)| from_document::<HeldItem>(doc))
            .collect::<Result<Vec<_>, StoreError>>()?)
    }

    pub(crate) fn read_categories(&self, path: &ListPath) -> Result<Vec<Category>, ServiceError> {
        let mut categories = self
            .store
            .list(&path.categories(), None)?
            .into_iter()
            .map(|(_, doc)| from_document::<Category>(doc))
            .collect::<Result<Vec<_>, StoreError>>()?;
        categories.sort_by_key(|cat| cat.order);
        Ok(categories)
    }

    pub(crate) fn read_suggestions(
        &self,
        path: &ListPath,
    ) -> Result<BTreeMap<String, Suggestion>, ServiceError> {
        self.store
            .list(&path.suggestions(), None)?
            .into_iter()
            .map(|(key, doc)| Ok((key, from_document::<Suggestion>(doc)?)))
            .collect()
    }

    // ---- items ----

    /// Add an item: parse the quantity, capitalize, annotate, persist, and
    /// record the suggestion — all in one batch. An explicit quantity wins
    /// over a parsed one.
    pub fn add_item(
        &self,
        list: &ShoppingList,
        category_id: &str,
        raw_text: &str,
        explicit_quantity: Option<&str>,
    ) -> Result<Item, ServiceError> {
        let path = self.path_for(list)?;
        let parsed = parse_item_text(raw_text);
        if parsed.text.is_empty() {
            return Err(ServiceError::Validation("item text is empty".into()));
        }

        let display = annotate(&capitalize_first(&parsed.text));
        let quantity = explicit_quantity
            .map(str::to_string)
            .or_else(|| parsed.quantity.map(|q| q.to_string()));

        let mut item = Item::new(display.clone(), category_id);
        item.quantity = quantity;

        let now = item.created_at;
        let key = normalized_key(&parsed.text);
        let suggestion_path = path.suggestions().doc(&key);

        let mut batch = WriteBatch::new();
        batch.set(path.items().doc(&item.id), to_document(&item)?);
        match self.store.get(&suggestion_path)? {
            Some(_) => {
                // Atomic increment; concurrent adds from two sessions both land.
                batch
                    .increment(suggestion_path.clone(), "frequency", 1)
                    .merge(suggestion_path, json!({ "lastAdded": now }));
            }
            None => {
                let suggestion = Suggestion {
                    text: display,
                    frequency: 1,
                    last_added: now,
                    category_id: category_id.to_string(),
                };
                batch.set(suggestion_path, to_document(&suggestion)?);
            }
        }
        self.store.commit(batch)?;

        tracing::debug!(item = %item.id, key = %key, "item added");
        Ok(item)
    }

    /// Edit an item's text and quantity. When the normalized key changes,
    /// the suggestion entry moves to the new key in the same batch; the
    /// destination, if any, is overwritten (last writer wins).
    pub fn edit_item(
        &self,
        list: &ShoppingList,
        item_id: &str,
        raw_text: &str,
        quantity: Option<&str>,
    ) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let item_path = path.items().doc(item_id);
        let old: Item = from_document(
            self.store
                .get(&item_path)?
                .ok_or_else(|| ServiceError::NotFound(format!("item {}", item_id)))?,
        )?;

        let parsed = parse_item_text(raw_text);
        if parsed.text.is_empty() {
            return Err(ServiceError::Validation("item text is empty".into()));
        }
        let display = annotate(&capitalize_first(&parsed.text));

        let mut batch = WriteBatch::new();
        batch.merge(item_path, json!({ "text": display, "quantity": quantity }));

        let old_key = normalized_key(&old.text);
        let new_key = normalized_key(&parsed.text);
        if old_key != new_key {
            let old_path = path.suggestions().doc(&old_key);
            if let Some(doc) = self.store.get(&old_path)? {
                batch.set(path.suggestions().doc(&new_key), doc);
                batch.delete(old_path);
            }
        }
        self.store.commit(batch)?;
        Ok(())
    }

    pub fn remove_item(&self, list: &ShoppingList, item_id: &str) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        self.store.delete(&path.items().doc(item_id))?;
        Ok(())
    }

    /// Two-phase optimistic toggle: the caller renders the returned item
    /// immediately; on error it gets the previous state back to revert to.
    pub fn toggle_item(&self, list: &ShoppingList, item: &Item) -> Result<Item, ToggleRevert> {
        let mut tentative = item.clone();
        tentative.done = !item.done;

        let result = self.path_for(list).and_then(|path| {
            self.store
                .merge(
                    &path.items().doc(&item.id),
                    json!({ "done": tentative.done }),
                )
                .map_err(ServiceError::from)
        });

        match result {
            Ok(()) => Ok(tentative),
            Err(source) => Err(ToggleRevert {
                previous: item.clone(),
                source,
            }),
        }
    }

    pub fn set_item_category(
        &self,
        list: &ShoppingList,
        item_id: &str,
        to_category_id: &str,
    ) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        self.store.merge(
            &path.items().doc(item_id),
            json!({ "categoryId": to_category_id }),
        )?;
        Ok(())
    }

    /// Remove every completed item, in one batch.
    pub fn remove_done_items(&self, list: &ShoppingList) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let mut batch = WriteBatch::new();
        for item in self.read_items(&path)? {
            if item.done {
                batch.delete(path.items().doc(&item.id));
            }
        }
        self.store.commit(batch)?;
        Ok(())
    }

    /// Remove every item, held or not, in one batch.
    pub fn remove_all_items(&self, list: &ShoppingList) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let mut batch = WriteBatch::new();
        for (id, _) in self.store.list(&path.items(), None)? {
            batch.delete(path.items().doc(id));
        }
        for (id, _) in self.store.list(&path.held_items(), None)? {
            batch.delete(path.held_items().doc(id));
        }
        self.store.commit(batch)?;
        Ok(())
    }

    // ---- held items ----

    /// Park an item: delete it from the active flow and create the held
    /// record in the same batch.
    pub fn hold_item(&self, list: &ShoppingList, item_id: &str) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let item: Item = from_document(
            self.store
                .get(&path.items().doc(item_id))?
                .ok_or_else(|| ServiceError::NotFound(format!("item {}", item_id)))?,
        )?;

        let held = item.hold();
        let mut batch = WriteBatch::new();
        batch.delete(path.items().doc(item_id));
        batch.set(path.held_items().doc(&held.id), to_document(&held)?);
        self.store.commit(batch)?;
        Ok(())
    }

    /// Return a held item to the given category; `done` resets to false.
    pub fn unhold_item(
        &self,
        list: &ShoppingList,
        held_id: &str,
        category_id: &str,
    ) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let held: HeldItem = from_document(
            self.store
                .get(&path.held_items().doc(held_id))?
                .ok_or_else(|| ServiceError::NotFound(format!("held item {}", held_id)))?,
        )?;

        let item = held.unhold(category_id);
        let mut batch = WriteBatch::new();
        batch.delete(path.held_items().doc(held_id));
        batch.set(path.items().doc(&item.id), to_document(&item)?);
        self.store.commit(batch)?;
        Ok(())
    }

    pub fn edit_held_item(
        &self,
        list: &ShoppingList,
        held_id: &str,
        raw_text: &str,
        quantity: Option<&str>,
    ) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let parsed = parse_item_text(raw_text);
        if parsed.text.is_empty() {
            return Err(ServiceError::Validation("item text is empty".into()));
        }
        let display = annotate(&capitalize_first(&parsed.text));
        self.store.merge(
            &path.held_items().doc(held_id),
            json!({ "text": display, "quantity": quantity }),
        )?;
        Ok(())
    }

    pub fn remove_held_item(&self, list: &ShoppingList, held_id: &str) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        self.store.delete(&path.held_items().doc(held_id))?;
        Ok(())
    }

    // ---- categories ----

    /// Create a category at the end of the current order.
    pub fn add_category(
        &self,
        list: &ShoppingList,
        name: &str,
        color: &str,
    ) -> Result<Category, ServiceError> {
        let path = self.path_for(list)?;
        let order = self.store.list(&path.categories(), None)?.len() as u32;
        let category = Category::new(name, color, order);
        self.store
            .set(&path.categories().doc(&category.id), to_document(&category)?)?;
        Ok(category)
    }

    pub fn update_category(
        &self,
        list: &ShoppingList,
        category_id: &str,
        name: &str,
        color: &str,
    ) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        self.store.merge(
            &path.categories().doc(category_id),
            json!({ "name": name, "color": color }),
        )?;
        Ok(())
    }

    /// Delete a category and cascade to its items, in one batch.
    pub fn delete_category(
        &self,
        list: &ShoppingList,
        category_id: &str,
    ) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let mut batch = WriteBatch::new();
        batch.delete(path.categories().doc(category_id));
        let filter = Filter::FieldEq("categoryId".into(), json!(category_id));
        for (id, _) in self.store.list(&path.items(), Some(&filter))? {
            batch.delete(path.items().doc(id));
        }
        self.store.commit(batch)?;
        Ok(())
    }

    /// Rewrite every category's order from the given sequence, keeping
    /// orders dense and contiguous. The sequence must cover the list's
    /// categories exactly.
    pub fn reorder_categories(
        &self,
        list: &ShoppingList,
        ordered_ids: &[String],
    ) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let existing: HashSet<String> = self
            .read_categories(&path)?
            .into_iter()
            .map(|cat| cat.id)
            .collect();
        let given: HashSet<&str> = ordered_ids.iter().map(String::as_str).collect();
        if given.len() != ordered_ids.len()
            || existing.len() != ordered_ids.len()
            || !existing.iter().all(|id| given.contains(id.as_str()))
        {
            return Err(ServiceError::Validation(
                "reorder must cover each category exactly once".into(),
            ));
        }

        let mut batch = WriteBatch::new();
        for (order, id) in ordered_ids.iter().enumerate() {
            batch.merge(path.categories().doc(id), json!({ "order": order as u32 }));
        }
        self.store.commit(batch)?;
        Ok(())
    }

    // ---- suggestions ----

    /// The ranked suggestions for display.
    pub fn ranked_suggestions(
        &self,
        list: &ShoppingList,
        search_term: Option<&str>,
    ) -> Result<Vec<RankedSuggestion>, ServiceError> {
        let path = self.path_for(list)?;
        let suggestions = self.read_suggestions(&path)?;
        let items = self.read_items(&path)?;
        Ok(rank(
            &suggestions,
            &items,
            Utc::now(),
            search_term,
            DEFAULT_SUGGESTION_LIMIT,
        ))
    }

    /// Rename a suggestion. A key change moves the entry in one batch
    /// (overwriting any destination entry); a case-only change edits in
    /// place. Editing a missing suggestion is a no-op.
    pub fn edit_suggestion(
        &self,
        list: &ShoppingList,
        old_key: &str,
        new_text: &str,
        category_id: &str,
    ) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        let old_path = path.suggestions().doc(old_key);
        let Some(doc) = self.store.get(&old_path)? else {
            return Ok(());
        };

        let parsed = parse_item_text(new_text);
        if parsed.text.is_empty() {
            return Err(ServiceError::Validation("suggestion text is empty".into()));
        }
        let display = annotate(&parsed.text);
        let new_key = normalized_key(&parsed.text);
        if old_key == new_key {
            self.store.merge(
                &old_path,
                json!({ "text": display, "categoryId": category_id }),
            )?;
            return Ok(());
        }

        let mut moved = doc;
        if let Some(fields) = moved.as_object_mut() {
            fields.insert("text".into(), json!(display));
            fields.insert("categoryId".into(), json!(category_id));
        }
        let mut batch = WriteBatch::new();
        batch.set(path.suggestions().doc(&new_key), moved);
        batch.delete(old_path);
        self.store.commit(batch)?;
        Ok(())
    }

    pub fn delete_suggestion(&self, list: &ShoppingList, key: &str) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        self.store.delete(&path.suggestions().doc(key))?;
        Ok(())
    }

    // ---- list lifecycle ----

    /// Create a list with the user as its sole owner.
    pub fn create_list(&self, user: &UserRef, name: &str) -> Result<ShoppingList, ServiceError> {
        let email = user
            .email
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("user has no email address".into()))?;
        let list = ShoppingList::new(name, &user.uid, email);
        self.store.set(
            &ListPath::lists_of(&user.uid).doc(&list.id),
            to_document(&list)?,
        )?;
        tracing::debug!(list = %list.id, "list created");
        Ok(list)
    }

    pub fn rename_list(&self, list: &ShoppingList, name: &str) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        self.store.merge(&path.doc(), json!({ "name": name }))?;
        Ok(())
    }

    /// Record that the list was opened.
    pub fn touch_list(&self, list: &ShoppingList) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        self.store
            .merge(&path.doc(), json!({ "lastOpened": Utc::now() }))?;
        Ok(())
    }

    /// Delete a list with all of its content. Only the owner may do this.
    pub fn delete_list(&self, list: &ShoppingList, user: &UserRef) -> Result<(), ServiceError> {
        let path = self.path_for(list)?;
        if path.owner_uid != user.uid {
            return Err(ServiceError::Validation(
                "only the owner can delete a list".into(),
            ));
        }

        let mut batch = WriteBatch::new();
        for collection in [
            path.categories(),
            path.items(),
            path.held_items(),
            path.suggestions(),
            path.backups(),
        ] {
            for (id, _) in self.store.list(&collection, None)? {
                batch.delete(collection.doc(id));
            }
        }
        batch.delete(path.doc());
        self.store.commit(batch)?;
        tracing::info!(list = %list.id, "list deleted");
        Ok(())
    }

    /// Every list the user belongs to, most recently opened first.
    pub fn lists_for(&self, user: &UserRef) -> Result<Vec<ShoppingList>, ServiceError> {
        let filter = Filter::ArrayContains("memberUids".into(), json!(user.uid));
        let mut lists = self
            .store
            .query_group("lists", &filter)?
            .into_iter()
            .map(|(_, doc)| from_document::<ShoppingList>(doc))
            .collect::<Result<Vec<_>, StoreError>>()?;
        lists.sort_by(|a, b| b.last_opened.cmp(&a.last_opened));
        Ok(lists)
    }
}
