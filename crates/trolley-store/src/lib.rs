//! Document-store abstraction for the trolley suite.
//!
//! The application delegates persistence to an external managed document
//! database; this crate models the slice of it the services rely on:
//! hierarchical document paths rooted at the list owner's partition, atomic
//! all-or-nothing write batches, collection scans with simple filters, and
//! snapshot subscriptions. [`MemoryStore`] is the reference backend, used by
//! tests and local mode.

pub mod batch;
pub mod memory;
pub mod path;
pub mod store;

pub use batch::{BatchOp, WriteBatch};
pub use memory::MemoryStore;
pub use path::{invites_collection, CollectionPath, DocPath, ListPath};
pub use store::{
    from_document, to_document, CollectionSnapshot, Document, DocumentStore, Filter, StoreError,
};
