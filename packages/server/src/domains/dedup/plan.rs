//! The merge unit of work.
//!
//! A merge is planned as an explicit, ordered list of writes and handed to
//! the storage layer, which applies the whole list atomically (all writes
//! commit or none do). Planning is pure; nothing here touches storage.

use serde::Serialize;
use uuid::Uuid;

use crate::common::{
    EntityKind, EventId, EventVendorId, FavoriteId, PromoterId, VendorId, VenueId,
};

/// One write inside a merge transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeWrite {
    /// Move events held at the duplicate venue onto the primary venue.
    RepointEventVenues { from: VenueId, to: VenueId },
    /// Move events run by the duplicate promoter onto the primary promoter.
    RepointEventPromoters { from: PromoterId, to: PromoterId },
    /// Remove the duplicate's participation rows whose counterpart is
    /// already linked to the primary (the overlap conflicts).
    DeleteEventVendors { ids: Vec<EventVendorId> },
    /// Move the duplicate vendor's remaining participation rows.
    RepointEventVendorsByVendor { from: VendorId, to: VendorId },
    /// Move the duplicate event's remaining participation rows.
    RepointEventVendorsByEvent { from: EventId, to: EventId },
    /// Add the duplicate event's view counter onto the primary's.
    AddEventViews { event: EventId, views: i64 },
    /// Remove the duplicate's favorites whose user already favorites the
    /// primary.
    DeleteFavorites { ids: Vec<FavoriteId> },
    /// Move the duplicate's remaining favorites onto the primary.
    RepointFavorites {
        kind: EntityKind,
        from: Uuid,
        to: Uuid,
    },
    /// Remove the duplicate record itself. Always last.
    DeleteEntity { kind: EntityKind, id: Uuid },
}

/// The full ordered write list for one merge.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub kind: EntityKind,
    pub primary_id: Uuid,
    pub duplicate_id: Uuid,
    pub writes: Vec<MergeWrite>,
}

/// Counts of dependent relationships a merge moves onto the primary.
/// Kind-specific fields stay `None` for kinds they do not apply to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCounts {
    /// Owned events repointed (venue and promoter merges).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<i64>,
    /// Participation rows repointed after conflict resolution (vendor and
    /// event merges).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_vendors: Option<i64>,
    /// Favorites repointed (all kinds); colliding favorites are dropped,
    /// never counted here.
    pub favorites: i64,
}
