//! Preview and result values for a merge.

use serde::Serialize;
use uuid::Uuid;

use super::entity::CatalogEntity;
use super::plan::TransferCounts;

/// What merging `duplicate` into `primary` would do. Read-only; computing a
/// preview has no side effects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePreview {
    pub primary: CatalogEntity,
    pub duplicate: CatalogEntity,
    pub relationships_to_transfer: TransferCounts,
    /// Advisory only; warnings never block the merge.
    pub warnings: Vec<String>,
    /// Always true once both ids resolve. Kept for the operator UI, which
    /// treats false as "do not offer the merge button".
    pub can_merge: bool,
}

/// Outcome of an executed merge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    /// The primary record re-read after the transaction committed.
    pub primary: CatalogEntity,
    /// Gone from storage; returned so clients can drop cached copies.
    pub merged_duplicate_id: Uuid,
    pub transferred_relationships: TransferCounts,
}
