//! Atomic write batches.

use crate::path::DocPath;
use crate::store::Document;

/// A single operation within a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    /// Replace the document (creating it if absent).
    Set { path: DocPath, doc: Document },
    /// Shallow-merge top-level fields into the document (creating it if
    /// absent).
    Merge { path: DocPath, fields: Document },
    /// Delete the document. Deleting an absent document is a no-op.
    Delete { path: DocPath },
    /// Atomically add `by` to an integer field of an existing document.
    /// A missing field counts as zero; a missing document is an error.
    Increment {
        path: DocPath,
        field: String,
        by: i64,
    },
}

/// An ordered set of writes applied all-or-nothing.
///
/// Multi-document effects (accepting an invitation, holding an item,
/// cascading a category delete, migrating a suggestion key) must go through
/// one batch so a failure applies nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: DocPath, doc: Document) -> &mut Self {
        self.ops.push(BatchOp::Set { path, doc });
        self
    }

    pub fn merge(&mut self, path: DocPath, fields: Document) -> &mut Self {
        self.ops.push(BatchOp::Merge { path, fields });
        self
    }

    pub fn delete(&mut self, path: DocPath) -> &mut Self {
        self.ops.push(BatchOp::Delete { path });
        self
    }

    pub fn increment(&mut self, path: DocPath, field: impl Into<String>, by: i64) -> &mut Self {
        self.ops.push(BatchOp::Increment {
            path,
            field: field.into(),
            by,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::CollectionPath;

    #[test]
    fn batch_builder_preserves_order() {
        let coll = CollectionPath::new("users/u/lists/l/items");
        let mut batch = WriteBatch::new();
        batch
            .set(coll.doc("a"), serde_json::json!({"text": "Milk"}))
            .delete(coll.doc("b"))
            .increment(coll.doc("a"), "frequency", 1);

        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.ops()[0], BatchOp::Set { .. }));
        assert!(matches!(batch.ops()[1], BatchOp::Delete { .. }));
        assert!(matches!(batch.ops()[2], BatchOp::Increment { .. }));
    }
}
