use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use crate::batch::{BatchOp, WriteBatch};
use crate::path::{CollectionPath, DocPath};
use crate::store::{CollectionSnapshot, Document, DocumentStore, Filter, StoreError};

/// In-memory implementation of the [`DocumentStore`] trait.
///
/// Documents live in one flat map keyed by full path. Batches validate every
/// operation against a working copy before the copy is swapped in, which
/// gives the all-or-nothing semantics the hosted store provides natively.
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Document>>,
    subscribers: Mutex<Vec<Subscriber>>,
}

struct Subscriber {
    collection: CollectionPath,
    filter: Option<Filter>,
    sender: Sender<CollectionSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(BTreeMap::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    fn lock_docs(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Document>>, StoreError> {
        self.docs
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".into()))
    }

    fn single(&self, op: BatchOp) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        match op {
            BatchOp::Set { path, doc } => {
                batch.set(path, doc);
            }
            BatchOp::Merge { path, fields } => {
                batch.merge(path, fields);
            }
            BatchOp::Delete { path } => {
                batch.delete(path);
            }
            BatchOp::Increment { path, field, by } => {
                batch.increment(path, field, by);
            }
        }
        self.commit(batch)
    }

    fn docs_in<'a>(
        docs: &'a BTreeMap<String, Document>,
        collection: &CollectionPath,
    ) -> Vec<(String, &'a Document)> {
        let prefix = format!("{}/", collection.as_str());
        docs.range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, doc)| {
                let id = &key[prefix.len()..];
                // Direct children only; deeper paths belong to subcollections.
                (!id.contains('/')).then(|| (id.to_string(), doc))
            })
            .collect()
    }

    fn snapshot_of(
        docs: &BTreeMap<String, Document>,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> CollectionSnapshot {
        CollectionSnapshot {
            collection: collection.clone(),
            docs: Self::docs_in(docs, collection)
                .into_iter()
                .filter(|(_, doc)| filter.map_or(true, |f| f.matches(doc)))
                .map(|(id, doc)| (id, doc.clone()))
                .collect(),
        }
    }

    fn notify(&self, docs: &BTreeMap<String, Document>, touched: &[CollectionPath]) {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return;
        };
        subscribers.retain(|sub| {
            if touched.contains(&sub.collection) {
                let snapshot = Self::snapshot_of(docs, &sub.collection, sub.filter.as_ref());
                sub.sender.send(snapshot).is_ok()
            } else {
                true
            }
        });
    }

    fn apply(
        docs: &mut BTreeMap<String, Document>,
        op: BatchOp,
        touched: &mut Vec<CollectionPath>,
    ) -> Result<(), StoreError> {
        let collection = match &op {
            BatchOp::Set { path, .. }
            | BatchOp::Merge { path, .. }
            | BatchOp::Delete { path }
            | BatchOp::Increment { path, .. } => path.collection.clone(),
        };

        match op {
            BatchOp::Set { path, doc } => {
                docs.insert(path.to_string(), doc);
            }
            BatchOp::Merge { path, fields } => {
                let fields = match fields {
                    Document::Object(map) => map,
                    other => {
                        return Err(StoreError::Validation(format!(
                            "merge fields must be an object, got {}",
                            other
                        )))
                    }
                };
                let key = path.to_string();
                match docs.get_mut(&key) {
                    Some(Document::Object(existing)) => {
                        for (field, value) in fields {
                            existing.insert(field, value);
                        }
                    }
                    Some(other) => {
                        return Err(StoreError::Validation(format!(
                            "cannot merge into non-object document {}: {}",
                            key, other
                        )))
                    }
                    None => {
                        docs.insert(key, Document::Object(fields));
                    }
                }
            }
            BatchOp::Delete { path } => {
                docs.remove(&path.to_string());
            }
            BatchOp::Increment { path, field, by } => {
                let key = path.to_string();
                let doc = docs
                    .get_mut(&key)
                    .ok_or_else(|| StoreError::NotFound(key.clone()))?;
                let Document::Object(map) = doc else {
                    return Err(StoreError::Validation(format!(
                        "cannot increment field of non-object document {}",
                        key
                    )));
                };
                let current = match map.get(&field) {
                    None | Some(Document::Null) => 0,
                    Some(value) => value.as_i64().ok_or_else(|| {
                        StoreError::Validation(format!(
                            "field {} of {} is not an integer",
                            field, key
                        ))
                    })?,
                };
                map.insert(field, Document::from(current + by));
            }
        }

        if !touched.contains(&collection) {
            touched.push(collection);
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        Ok(self.lock_docs()?.get(&path.to_string()).cloned())
    }

    fn set(&self, path: &DocPath, doc: Document) -> Result<(), StoreError> {
        self.single(BatchOp::Set {
            path: path.clone(),
            doc,
        })
    }

    fn merge(&self, path: &DocPath, fields: Document) -> Result<(), StoreError> {
        self.single(BatchOp::Merge {
            path: path.clone(),
            fields,
        })
    }

    fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        self.single(BatchOp::Delete { path: path.clone() })
    }

    fn list(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let docs = self.lock_docs()?;
        Ok(Self::docs_in(&docs, collection)
            .into_iter()
            .filter(|(_, doc)| filter.map_or(true, |f| f.matches(doc)))
            .map(|(id, doc)| (id, doc.clone()))
            .collect())
    }

    fn query_group(
        &self,
        collection_name: &str,
        filter: &Filter,
    ) -> Result<Vec<(DocPath, Document)>, StoreError> {
        let docs = self.lock_docs()?;
        Ok(docs
            .iter()
            .filter_map(|(key, doc)| {
                let (collection, id) = key.rsplit_once('/')?;
                let name = collection.rsplit('/').next()?;
                (name == collection_name && filter.matches(doc)).then(|| {
                    (
                        CollectionPath::new(collection).doc(id),
                        doc.clone(),
                    )
                })
            })
            .collect())
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut docs = self.lock_docs()?;

        // Apply against a working copy so a failing op leaves nothing behind.
        let mut staged = docs.clone();
        let mut touched = Vec::new();
        for op in batch.into_ops() {
            Self::apply(&mut staged, op, &mut touched)?;
        }

        *docs = staged;
        self.notify(&docs, &touched);
        Ok(())
    }

    fn subscribe(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Receiver<CollectionSnapshot>, StoreError> {
        let (tx, rx) = mpsc::channel();
        {
            let docs = self.lock_docs()?;
            // Initial snapshot, then one per change.
            let _ = tx.send(Self::snapshot_of(&docs, collection, filter));
        }
        self.subscribers
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".into()))?
            .push(Subscriber {
                collection: collection.clone(),
                filter: filter.cloned(),
                sender: tx,
            });
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ListPath;
    use serde_json::json;

    fn items() -> CollectionPath {
        ListPath::new("u1", "l1").items()
    }

    #[test]
    fn set_get_delete() {
        let store = MemoryStore::new();
        let path = items().doc("a");

        store.set(&path, json!({"text": "Milk"})).unwrap();
        assert_eq!(store.get(&path).unwrap(), Some(json!({"text": "Milk"})));

        store.delete(&path).unwrap();
        assert_eq!(store.get(&path).unwrap(), None);
    }

    #[test]
    fn merge_updates_and_creates() {
        let store = MemoryStore::new();
        let path = items().doc("a");

        store.set(&path, json!({"text": "Milk", "done": false})).unwrap();
        store.merge(&path, json!({"done": true})).unwrap();
        assert_eq!(
            store.get(&path).unwrap(),
            Some(json!({"text": "Milk", "done": true}))
        );

        let absent = items().doc("b");
        store.merge(&absent, json!({"text": "Bread"})).unwrap();
        assert_eq!(store.get(&absent).unwrap(), Some(json!({"text": "Bread"})));
    }

    #[test]
    fn list_returns_direct_children_only() {
        let store = MemoryStore::new();
        let list = ListPath::new("u1", "l1");
        store.set(&list.items().doc("a"), json!({"text": "Milk"})).unwrap();
        store.set(&list.suggestions().doc("milk"), json!({"frequency": 1})).unwrap();
        store.set(&list.doc(), json!({"name": "Groceries"})).unwrap();

        let docs = store.list(&list.items(), None).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].0, "a");
    }

    #[test]
    fn increment_is_atomic_with_the_batch() {
        let store = MemoryStore::new();
        let path = items().doc("a");
        store.set(&path, json!({"frequency": 2})).unwrap();

        let mut batch = WriteBatch::new();
        batch.increment(path.clone(), "frequency", 1);
        store.commit(batch).unwrap();
        assert_eq!(store.get(&path).unwrap(), Some(json!({"frequency": 3})));

        // Incrementing a missing document fails the whole batch.
        let mut batch = WriteBatch::new();
        batch
            .set(items().doc("b"), json!({"text": "Bread"}))
            .increment(items().doc("missing"), "frequency", 1);
        assert!(store.commit(batch).is_err());
        assert_eq!(store.get(&items().doc("b")).unwrap(), None);
    }

    #[test]
    fn query_group_spans_partitions() {
        let store = MemoryStore::new();
        let a = ListPath::new("u1", "l1");
        let b = ListPath::new("u2", "l2");
        store
            .set(&a.doc(), json!({"name": "A", "memberUids": ["u1", "u3"]}))
            .unwrap();
        store
            .set(&b.doc(), json!({"name": "B", "memberUids": ["u2"]}))
            .unwrap();

        let filter = Filter::ArrayContains("memberUids".into(), json!("u3"));
        let hits = store.query_group("lists", &filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1["name"], json!("A"));
    }

    #[test]
    fn subscribe_delivers_initial_and_change_snapshots() {
        let store = MemoryStore::new();
        let coll = items();
        let rx = store.subscribe(&coll, None).unwrap();

        let initial = rx.try_recv().unwrap();
        assert!(initial.docs.is_empty());

        store.set(&coll.doc("a"), json!({"text": "Milk"})).unwrap();
        let snapshot = rx.try_recv().unwrap();
        assert_eq!(snapshot.docs.len(), 1);

        // Writes to other collections do not notify this subscriber.
        store
            .set(&ListPath::new("u1", "l1").categories().doc("c"), json!({"name": "Dairy"}))
            .unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn filtered_subscription_narrows_snapshots() {
        let store = MemoryStore::new();
        let coll = CollectionPath::new("list-invites");
        let filter = Filter::FieldEq("toEmail".into(), json!("b@example.com"));
        let rx = store.subscribe(&coll, Some(&filter)).unwrap();
        assert!(rx.try_recv().unwrap().docs.is_empty());

        store
            .set(&coll.doc("i1"), json!({"toEmail": "a@example.com"}))
            .unwrap();
        store
            .set(&coll.doc("i2"), json!({"toEmail": "b@example.com"}))
            .unwrap();

        let snapshot = rx.iter().take(2).last().unwrap();
        assert_eq!(snapshot.docs.len(), 1);
        assert_eq!(snapshot.docs[0].0, "i2");
    }
}
