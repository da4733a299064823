// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The dedup
// engine's planning and scoring live in domains/dedup and consume these
// seams; swapping Postgres for the in-memory store must not change any
// merge semantics.
//
// Naming convention: Base* for trait names (e.g., BaseCatalogStore)

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::common::{EntityKind, EventId, PromoterId, VendorId, VenueId};
use crate::domains::dedup::plan::MergePlan;
use crate::domains::events::models::{Event, EventVendor};
use crate::domains::favorites::models::Favorite;
use crate::domains::promoters::models::Promoter;
use crate::domains::vendors::models::Vendor;
use crate::domains::venues::models::Venue;

/// Storage-layer failure.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness or integrity constraint rejected a write; the enclosing
    /// transaction was rolled back.
    #[error("storage conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

// =============================================================================
// Catalog Store Trait (Infrastructure - persistence seam)
// =============================================================================

/// Read access to the directory catalog plus one atomic write entry point.
///
/// List methods return records in a stable insertion order so that repeated
/// pair-finding runs over unchanged data are deterministic. `apply_merge`
/// is the only mutation: the implementation must apply the whole plan as a
/// single unit of work, with no partial state visible on failure.
#[async_trait]
pub trait BaseCatalogStore: Send + Sync {
    async fn list_venues(&self) -> Result<Vec<Venue>, StoreError>;
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;
    async fn list_vendors(&self) -> Result<Vec<Vendor>, StoreError>;
    async fn list_promoters(&self) -> Result<Vec<Promoter>, StoreError>;

    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, StoreError>;
    async fn find_event(&self, id: EventId) -> Result<Option<Event>, StoreError>;
    async fn find_vendor(&self, id: VendorId) -> Result<Option<Vendor>, StoreError>;
    async fn find_promoter(&self, id: PromoterId) -> Result<Option<Promoter>, StoreError>;

    /// Events held at a venue.
    async fn events_for_venue(&self, id: VenueId) -> Result<Vec<Event>, StoreError>;
    /// Events run by a promoter.
    async fn events_for_promoter(&self, id: PromoterId) -> Result<Vec<Event>, StoreError>;
    /// Participation rows for a vendor.
    async fn participations_for_vendor(&self, id: VendorId)
        -> Result<Vec<EventVendor>, StoreError>;
    /// Participation rows for an event.
    async fn participations_for_event(&self, id: EventId) -> Result<Vec<EventVendor>, StoreError>;
    /// Favorites pointing at a given entity.
    async fn favorites_for(
        &self,
        kind: EntityKind,
        target: Uuid,
    ) -> Result<Vec<Favorite>, StoreError>;

    /// Total record count for a kind.
    async fn count_entities(&self, kind: EntityKind) -> Result<i64, StoreError>;

    /// Apply every write in the plan atomically. On any failure the store
    /// must be left exactly as it was before the call.
    async fn apply_merge(&self, plan: &MergePlan) -> Result<(), StoreError>;
}

// =============================================================================
// Authorizer Trait (Infrastructure - admin classification)
// =============================================================================

/// Classifies a caller as administrative or not. Dedup and merge endpoints
/// reject non-administrative callers before any computation runs.
#[async_trait]
pub trait BaseAuthorizer: Send + Sync {
    async fn is_admin(&self, bearer_token: Option<&str>) -> bool;
}
