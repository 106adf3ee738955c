//! Service layer of the trolley suite.
//!
//! `ListService` exposes the item, category, suggestion, backup, and list
//! lifecycle operations the rendering layer calls; `SharingService` covers
//! invitations. Both resolve the list owner first and route every write into
//! the owner's storage partition, and both express multi-document effects as
//! single atomic batches.

pub mod backup;
pub mod error;
pub mod lists;
pub mod sharing;

pub use error::ServiceError;
pub use lists::{ListService, ToggleRevert};
pub use sharing::SharingService;
