use thiserror::Error;
use uuid::Uuid;

use crate::common::EntityKind;
use crate::kernel::StoreError;

/// Error taxonomy for the duplicate-detection and merge operations.
#[derive(Error, Debug)]
pub enum DedupError {
    /// The `type` parameter is not one of the four mergeable kinds.
    #[error("invalid entity type: {0:?}")]
    InvalidEntityType(String),

    /// Threshold outside [0, 1]. Caller must correct input.
    #[error("threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),

    /// Primary and duplicate id are the same record.
    #[error("cannot merge a record with itself")]
    SelfMerge,

    /// A merge-target id did not resolve. No mutation was attempted.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    /// The atomic merge transaction aborted; no partial state exists and
    /// the caller may retry from scratch.
    #[error("merge failed: {0}")]
    MergeFailed(String),

    /// Read-side storage failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
