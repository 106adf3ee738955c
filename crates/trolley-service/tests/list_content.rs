//! List content flows against the in-memory store: items, suggestions,
//! held items, categories, and backups.

use std::sync::Arc;

use serde_json::json;
use trolley_core::{Item, ShoppingList, Suggestion, UserRef};
use trolley_service::{ListService, ServiceError};
use trolley_store::{from_document, DocumentStore, ListPath, MemoryStore};

fn setup() -> (Arc<MemoryStore>, ListService, ShoppingList) {
    let store = Arc::new(MemoryStore::new());
    let service = ListService::new(store.clone());
    let user = UserRef::new("u1", Some("u1@example.com".to_string()));
    let list = service.create_list(&user, "Groceries").unwrap();
    (store, service, list)
}

fn list_path(list: &ShoppingList) -> ListPath {
    ListPath::new("u1", &list.id)
}

fn suggestion_at(store: &MemoryStore, list: &ShoppingList, key: &str) -> Option<Suggestion> {
    store
        .get(&list_path(list).suggestions().doc(key))
        .unwrap()
        .map(|doc| from_document(doc).unwrap())
}

#[test]
fn add_item_parses_capitalizes_and_annotates() {
    let (_, service, list) = setup();

    let item = service.add_item(&list, "c1", "milk x3", None).unwrap();
    assert_eq!(item.text, "🥛 Milk");
    assert_eq!(item.quantity.as_deref(), Some("3"));
    assert!(!item.done);

    let item = service.add_item(&list, "c1", "2 apples", None).unwrap();
    assert_eq!(item.text, "🍎 Apples");
    assert_eq!(item.quantity.as_deref(), Some("2"));
}

#[test]
fn explicit_quantity_wins_over_parsed() {
    let (_, service, list) = setup();
    let item = service.add_item(&list, "c1", "milk x3", Some("6")).unwrap();
    assert_eq!(item.quantity.as_deref(), Some("6"));
}

#[test]
fn empty_text_is_a_validation_error() {
    let (_, service, list) = setup();
    assert!(matches!(
        service.add_item(&list, "c1", "   ", None),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn adding_records_and_increments_the_suggestion() {
    let (store, service, list) = setup();

    let first = service.add_item(&list, "c1", "milk", None).unwrap();
    let suggestion = suggestion_at(&store, &list, "milk").unwrap();
    assert_eq!(suggestion.frequency, 1);
    assert_eq!(suggestion.text, "🥛 Milk");
    assert_eq!(suggestion.category_id, "c1");

    service.remove_item(&list, &first.id).unwrap();
    service.add_item(&list, "c1", "Milk", None).unwrap();
    let suggestion = suggestion_at(&store, &list, "milk").unwrap();
    assert_eq!(suggestion.frequency, 2);
}

#[test]
fn ranked_suggestions_exclude_items_on_the_list() {
    let (_, service, list) = setup();

    let item = service.add_item(&list, "c1", "milk", None).unwrap();
    service.add_item(&list, "c1", "bread", None).unwrap();
    assert!(service.ranked_suggestions(&list, None).unwrap().is_empty());

    // Once the item is off the list, its suggestion resurfaces.
    service.remove_item(&list, &item.id).unwrap();
    let ranked = service.ranked_suggestions(&list, None).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].key, "milk");
}

#[test]
fn case_only_rename_keeps_the_suggestion_in_place() {
    let (store, service, list) = setup();
    let item = service.add_item(&list, "c1", "milk", None).unwrap();

    service.edit_item(&list, &item.id, "MILK", None).unwrap();

    let suggestions = store
        .list(&list_path(&list).suggestions(), None)
        .unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].0, "milk");
    assert_eq!(suggestion_at(&store, &list, "milk").unwrap().frequency, 1);
}

#[test]
fn rename_migrates_the_suggestion_key() {
    let (store, service, list) = setup();
    let item = service.add_item(&list, "c1", "milk", None).unwrap();

    service
        .edit_item(&list, &item.id, "almond milk", None)
        .unwrap();

    assert!(suggestion_at(&store, &list, "milk").is_none());
    let moved = suggestion_at(&store, &list, "almond milk").unwrap();
    assert_eq!(moved.frequency, 1);

    let edited: Item =
        from_document(store.get(&list_path(&list).items().doc(&item.id)).unwrap().unwrap())
            .unwrap();
    assert_eq!(edited.text, "🥛 Almond milk");
}

#[test]
fn hold_and_unhold_move_the_item_between_collections() {
    let (store, service, list) = setup();
    let item = service.add_item(&list, "c1", "milk", None).unwrap();
    let toggled = service.toggle_item(&list, &item).unwrap();
    assert!(toggled.done);

    service.hold_item(&list, &item.id).unwrap();
    assert!(store.list(&list_path(&list).items(), None).unwrap().is_empty());
    assert_eq!(store.list(&list_path(&list).held_items(), None).unwrap().len(), 1);

    service.unhold_item(&list, &item.id, "c2").unwrap();
    assert!(store.list(&list_path(&list).held_items(), None).unwrap().is_empty());
    let restored: Item =
        from_document(store.get(&list_path(&list).items().doc(&item.id)).unwrap().unwrap())
            .unwrap();
    assert_eq!(restored.category_id, "c2");
    assert!(!restored.done);
    assert_eq!(restored.created_at, item.created_at);
}

#[test]
fn toggle_failure_hands_back_the_previous_state() {
    let (_, service, list) = setup();
    let item = service.add_item(&list, "c1", "milk", None).unwrap();

    // An ownerless list fails before any write is attempted.
    let mut broken = list.clone();
    broken.members.clear();
    let revert = service.toggle_item(&broken, &item).unwrap_err();
    assert_eq!(revert.previous, item);
}

#[test]
fn delete_category_cascades_to_its_items() {
    let (store, service, list) = setup();
    let dairy = service.add_category(&list, "Dairy", "#fff8e1").unwrap();
    let bakery = service.add_category(&list, "Bakery", "#efebe9").unwrap();
    service.add_item(&list, &dairy.id, "milk", None).unwrap();
    let kept = service.add_item(&list, &bakery.id, "bread", None).unwrap();

    service.delete_category(&list, &dairy.id).unwrap();

    let remaining = store.list(&list_path(&list).items(), None).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].0, kept.id);
    assert_eq!(store.list(&list_path(&list).categories(), None).unwrap().len(), 1);
}

#[test]
fn reorder_rewrites_dense_orders() {
    let (store, service, list) = setup();
    let a = service.add_category(&list, "A", "#111").unwrap();
    let b = service.add_category(&list, "B", "#222").unwrap();
    let c = service.add_category(&list, "C", "#333").unwrap();
    assert_eq!((a.order, b.order, c.order), (0, 1, 2));

    service
        .reorder_categories(&list, &[c.id.clone(), a.id.clone(), b.id.clone()])
        .unwrap();

    let order_of = |id: &str| {
        store
            .get(&list_path(&list).categories().doc(id))
            .unwrap()
            .unwrap()["order"]
            .clone()
    };
    assert_eq!(order_of(&c.id), json!(0));
    assert_eq!(order_of(&a.id), json!(1));
    assert_eq!(order_of(&b.id), json!(2));

    // A partial sequence is rejected.
    assert!(matches!(
        service.reorder_categories(&list, &[a.id.clone()]),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn remove_done_items_only_removes_done_ones() {
    let (store, service, list) = setup();
    let milk = service.add_item(&list, "c1", "milk", None).unwrap();
    service.add_item(&list, "c1", "bread", None).unwrap();
    service.toggle_item(&list, &milk).unwrap();

    service.remove_done_items(&list).unwrap();

    let remaining = store.list(&list_path(&list).items(), None).unwrap();
    assert_eq!(remaining.len(), 1);
}

#[test]
fn backup_restore_brings_back_the_snapshotted_state() {
    let (store, service, list) = setup();
    service.add_category(&list, "Dairy", "#fff8e1").unwrap();
    service.add_item(&list, "c1", "milk", None).unwrap();

    let (backup_id, backup) = service.snapshot(&list).unwrap();
    assert_eq!(backup.items.len(), 1);

    // Mutate past the snapshot.
    service.add_item(&list, "c1", "bread", None).unwrap();
    service.add_item(&list, "c1", "eggs", None).unwrap();
    assert_eq!(store.list(&list_path(&list).items(), None).unwrap().len(), 3);

    service.restore(&list, &backup_id).unwrap();

    let items = store.list(&list_path(&list).items(), None).unwrap();
    assert_eq!(items.len(), 1);
    let item: Item = from_document(items[0].1.clone()).unwrap();
    assert_eq!(item.text, "🥛 Milk");
    // Suggestions were rolled back with the rest of the content.
    assert!(suggestion_at(&store, &list, "bread").is_none());
    assert!(suggestion_at(&store, &list, "milk").is_some());

    // Backups are newest-first and survive the restore.
    let backups = service.backups(&list).unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].0, backup_id);
}

#[test]
fn lists_are_sorted_by_last_opened() {
    let (_, service, _) = setup();
    let user = UserRef::new("u1", Some("u1@example.com".to_string()));
    let second = service.create_list(&user, "Hardware").unwrap();

    service.touch_list(&second).unwrap();
    let lists = service.lists_for(&user).unwrap();
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].id, second.id);
}
