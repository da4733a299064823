//! Duplicate detection and merge orchestration.
//!
//! `DedupService` is the caller-facing surface of the engine: it validates
//! input, loads records and dependents through the storage seam, runs the
//! pure scoring/planning code, and hands finished plans to the store. All
//! operations are stateless and recomputed from current data on every call,
//! so previews and failed merges are always safe to retry.

use std::cmp::Ordering;
use std::sync::Arc;

use uuid::Uuid;

use crate::common::{EntityKind, Id};
use crate::kernel::BaseCatalogStore;

use super::candidates::{
    event_candidates, promoter_candidates, vendor_candidates, venue_candidates, DuplicateCandidate,
};
use super::entity::CatalogEntity;
use super::error::DedupError;
use super::finder::{find_duplicate_pairs, DuplicatePair};
use super::planner::{plan_merge, MergeInputs};
use super::preview::{MergePreview, MergeResult};

/// Default pair-finding threshold when the caller does not supply one.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

pub struct DedupService {
    store: Arc<dyn BaseCatalogStore>,
}

impl DedupService {
    pub fn new(store: Arc<dyn BaseCatalogStore>) -> Self {
        Self { store }
    }

    /// Find candidate duplicate pairs of one kind, ranked by descending
    /// similarity; ties keep collection order, so the output is stable for
    /// unchanged data.
    pub async fn find_duplicates(
        &self,
        kind: EntityKind,
        threshold: f64,
    ) -> Result<Vec<DuplicatePair<DuplicateCandidate>>, DedupError> {
        if !(0.0..=1.0).contains(&threshold) || threshold.is_nan() {
            return Err(DedupError::InvalidThreshold(threshold));
        }

        let candidates = self.load_candidates(kind).await?;
        let mut pairs =
            find_duplicate_pairs(&candidates, |c| c.comparison_string.clone(), threshold);

        // Stable sort: equal scores keep the finder's input order.
        pairs.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });

        tracing::info!(
            kind = %kind,
            threshold,
            candidates = candidates.len(),
            pairs = pairs.len(),
            "Duplicate scan complete"
        );

        Ok(pairs)
    }

    /// Compute what merging `duplicate_id` into `primary_id` would do.
    /// Fails with `NotFound` if either id does not resolve; performs no
    /// mutation ever.
    pub async fn merge_preview(
        &self,
        kind: EntityKind,
        primary_id: Uuid,
        duplicate_id: Uuid,
    ) -> Result<MergePreview, DedupError> {
        if primary_id == duplicate_id {
            return Err(DedupError::SelfMerge);
        }

        let inputs = self.load_merge_inputs(kind, primary_id, duplicate_id).await?;
        let planned = plan_merge(kind, &inputs);

        Ok(MergePreview {
            primary: inputs.primary,
            duplicate: inputs.duplicate,
            relationships_to_transfer: planned.transfer,
            warnings: planned.warnings,
            // Permissive by design: nothing blocks a merge once both ids
            // resolve. Warnings carry anything the operator should weigh.
            can_merge: true,
        })
    }

    /// Merge `duplicate_id` into `primary_id` as one atomic unit of work.
    ///
    /// On failure the transaction is rolled back, both records remain
    /// untouched, and the operation may be retried blindly; after a
    /// success, retries fail fast with `NotFound` because the duplicate id
    /// no longer resolves.
    pub async fn execute_merge(
        &self,
        kind: EntityKind,
        primary_id: Uuid,
        duplicate_id: Uuid,
    ) -> Result<MergeResult, DedupError> {
        if primary_id == duplicate_id {
            return Err(DedupError::SelfMerge);
        }

        let inputs = self.load_merge_inputs(kind, primary_id, duplicate_id).await?;
        let planned = plan_merge(kind, &inputs);

        tracing::info!(
            kind = %kind,
            primary_id = %primary_id,
            primary_name = inputs.primary.display_name(),
            duplicate_id = %duplicate_id,
            duplicate_name = inputs.duplicate.display_name(),
            writes = planned.plan.writes.len(),
            conflicts = planned.conflicts,
            "Executing merge"
        );

        self.store
            .apply_merge(&planned.plan)
            .await
            .map_err(|e| DedupError::MergeFailed(e.to_string()))?;

        // Re-read so the caller sees post-merge state (view counters etc.)
        let primary = self.load_entity(kind, primary_id).await?;

        tracing::info!(
            kind = %kind,
            primary_id = %primary_id,
            duplicate_id = %duplicate_id,
            favorites = planned.transfer.favorites,
            "Merge complete"
        );

        Ok(MergeResult {
            primary,
            merged_duplicate_id: duplicate_id,
            transferred_relationships: planned.transfer,
        })
    }

    async fn load_candidates(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<DuplicateCandidate>, DedupError> {
        let candidates = match kind {
            EntityKind::Venue => venue_candidates(&self.store.list_venues().await?),
            EntityKind::Event => {
                let events = self.store.list_events().await?;
                let venues = self.store.list_venues().await?;
                let promoters = self.store.list_promoters().await?;
                event_candidates(&events, &venues, &promoters)
            }
            EntityKind::Vendor => vendor_candidates(&self.store.list_vendors().await?),
            EntityKind::Promoter => promoter_candidates(&self.store.list_promoters().await?),
        };
        Ok(candidates)
    }

    async fn load_entity(
        &self,
        kind: EntityKind,
        id: Uuid,
    ) -> Result<CatalogEntity, DedupError> {
        let not_found = || DedupError::NotFound { kind, id };
        let entity = match kind {
            EntityKind::Venue => self
                .store
                .find_venue(Id::from_uuid(id))
                .await?
                .map(CatalogEntity::Venue)
                .ok_or_else(not_found)?,
            EntityKind::Event => self
                .store
                .find_event(Id::from_uuid(id))
                .await?
                .map(CatalogEntity::Event)
                .ok_or_else(not_found)?,
            EntityKind::Vendor => self
                .store
                .find_vendor(Id::from_uuid(id))
                .await?
                .map(CatalogEntity::Vendor)
                .ok_or_else(not_found)?,
            EntityKind::Promoter => self
                .store
                .find_promoter(Id::from_uuid(id))
                .await?
                .map(CatalogEntity::Promoter)
                .ok_or_else(not_found)?,
        };
        Ok(entity)
    }

    /// Load both records and every dependent the planner looks at.
    async fn load_merge_inputs(
        &self,
        kind: EntityKind,
        primary_id: Uuid,
        duplicate_id: Uuid,
    ) -> Result<MergeInputs, DedupError> {
        let primary = self.load_entity(kind, primary_id).await?;
        let duplicate = self.load_entity(kind, duplicate_id).await?;

        let mut inputs = MergeInputs {
            primary,
            duplicate,
            duplicate_owned_events: vec![],
            primary_participations: vec![],
            duplicate_participations: vec![],
            primary_favorites: self.store.favorites_for(kind, primary_id).await?,
            duplicate_favorites: self.store.favorites_for(kind, duplicate_id).await?,
        };

        match kind {
            EntityKind::Venue => {
                inputs.duplicate_owned_events =
                    self.store.events_for_venue(Id::from_uuid(duplicate_id)).await?;
            }
            EntityKind::Promoter => {
                inputs.duplicate_owned_events = self
                    .store
                    .events_for_promoter(Id::from_uuid(duplicate_id))
                    .await?;
            }
            EntityKind::Vendor => {
                inputs.primary_participations = self
                    .store
                    .participations_for_vendor(Id::from_uuid(primary_id))
                    .await?;
                inputs.duplicate_participations = self
                    .store
                    .participations_for_vendor(Id::from_uuid(duplicate_id))
                    .await?;
            }
            EntityKind::Event => {
                inputs.primary_participations = self
                    .store
                    .participations_for_event(Id::from_uuid(primary_id))
                    .await?;
                inputs.duplicate_participations = self
                    .store
                    .participations_for_event(Id::from_uuid(duplicate_id))
                    .await?;
            }
        }

        Ok(inputs)
    }
}
