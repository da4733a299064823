//! Postgres-backed catalog store.
//!
//! Reads delegate to the model queries; `apply_merge` runs the planned
//! write list inside one transaction so a failure anywhere rolls the whole
//! merge back.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{EntityKind, EventId, Id, PromoterId, VendorId, VenueId};
use crate::domains::dedup::plan::{MergePlan, MergeWrite};
use crate::domains::events::models::{Event, EventVendor};
use crate::domains::favorites::models::Favorite;
use crate::domains::promoters::models::Promoter;
use crate::domains::vendors::models::Vendor;
use crate::domains::venues::models::Venue;

use super::super::traits::{BaseCatalogStore, StoreError};

#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCatalogStore for PostgresCatalogStore {
    async fn list_venues(&self) -> Result<Vec<Venue>, StoreError> {
        Ok(Venue::find_all(&self.pool).await?)
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(Event::find_all(&self.pool).await?)
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        Ok(Vendor::find_all(&self.pool).await?)
    }

    async fn list_promoters(&self) -> Result<Vec<Promoter>, StoreError> {
        Ok(Promoter::find_all(&self.pool).await?)
    }

    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, StoreError> {
        Ok(Venue::find_by_id(id, &self.pool).await?)
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(Event::find_by_id(id, &self.pool).await?)
    }

    async fn find_vendor(&self, id: VendorId) -> Result<Option<Vendor>, StoreError> {
        Ok(Vendor::find_by_id(id, &self.pool).await?)
    }

    async fn find_promoter(&self, id: PromoterId) -> Result<Option<Promoter>, StoreError> {
        Ok(Promoter::find_by_id(id, &self.pool).await?)
    }

    async fn events_for_venue(&self, id: VenueId) -> Result<Vec<Event>, StoreError> {
        Ok(Event::find_for_venue(id, &self.pool).await?)
    }

    async fn events_for_promoter(&self, id: PromoterId) -> Result<Vec<Event>, StoreError> {
        Ok(Event::find_for_promoter(id, &self.pool).await?)
    }

    async fn participations_for_vendor(
        &self,
        id: VendorId,
    ) -> Result<Vec<EventVendor>, StoreError> {
        Ok(EventVendor::find_for_vendor(id, &self.pool).await?)
    }

    async fn participations_for_event(&self, id: EventId) -> Result<Vec<EventVendor>, StoreError> {
        Ok(EventVendor::find_for_event(id, &self.pool).await?)
    }

    async fn favorites_for(
        &self,
        kind: EntityKind,
        target: Uuid,
    ) -> Result<Vec<Favorite>, StoreError> {
        Ok(Favorite::find_for_target(kind, target, &self.pool).await?)
    }

    async fn count_entities(&self, kind: EntityKind) -> Result<i64, StoreError> {
        let count = match kind {
            EntityKind::Venue => Venue::count(&self.pool).await?,
            EntityKind::Event => Event::count(&self.pool).await?,
            EntityKind::Vendor => Vendor::count(&self.pool).await?,
            EntityKind::Promoter => Promoter::count(&self.pool).await?,
        };
        Ok(count)
    }

    async fn apply_merge(&self, plan: &MergePlan) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(anyhow::Error::from)?;

        for write in &plan.writes {
            match write {
                MergeWrite::RepointEventVenues { from, to } => {
                    Event::repoint_venue(*from, *to, &mut *tx).await?;
                }
                MergeWrite::RepointEventPromoters { from, to } => {
                    Event::repoint_promoter(*from, *to, &mut *tx).await?;
                }
                MergeWrite::DeleteEventVendors { ids } => {
                    EventVendor::delete_by_ids(ids, &mut *tx).await?;
                }
                MergeWrite::RepointEventVendorsByVendor { from, to } => {
                    EventVendor::repoint_vendor(*from, *to, &mut *tx).await?;
                }
                MergeWrite::RepointEventVendorsByEvent { from, to } => {
                    EventVendor::repoint_event(*from, *to, &mut *tx).await?;
                }
                MergeWrite::AddEventViews { event, views } => {
                    Event::add_views(*event, *views, &mut *tx).await?;
                }
                MergeWrite::DeleteFavorites { ids } => {
                    Favorite::delete_by_ids(ids, &mut *tx).await?;
                }
                MergeWrite::RepointFavorites { kind, from, to } => {
                    Favorite::repoint_target(*kind, *from, *to, &mut *tx).await?;
                }
                MergeWrite::DeleteEntity { kind, id } => {
                    let removed = match kind {
                        EntityKind::Venue => Venue::delete(Id::from_uuid(*id), &mut *tx).await?,
                        EntityKind::Event => Event::delete(Id::from_uuid(*id), &mut *tx).await?,
                        EntityKind::Vendor => Vendor::delete(Id::from_uuid(*id), &mut *tx).await?,
                        EntityKind::Promoter => {
                            Promoter::delete(Id::from_uuid(*id), &mut *tx).await?
                        }
                    };
                    if removed != 1 {
                        // A concurrent merge already consumed the duplicate;
                        // abort rather than commit a half-meaningful plan.
                        return Err(StoreError::Conflict(format!(
                            "{kind} {id} vanished mid-merge"
                        )));
                    }
                }
            }
        }

        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(())
    }
}
