use thiserror::Error;
use trolley_collab::OwnershipError;
use trolley_store::StoreError;

/// Errors surfaced by the service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required field is missing or malformed; the operation was a no-op.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced list, invite, or item no longer exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// The list membership invariant is violated; no writes were attempted.
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    /// The underlying document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
