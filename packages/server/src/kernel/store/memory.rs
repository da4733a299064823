//! In-memory catalog store.
//!
//! Backs the dedup/merge test suites and local experiments without a
//! database. `apply_merge` works on a copy of the state and swaps it in
//! only after every write succeeded and the catalog invariants re-checked,
//! which gives the same all-or-nothing behavior as the Postgres
//! transaction. A fault can be injected after N writes to exercise the
//! rollback path.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use crate::common::{EntityKind, EventId, PromoterId, VendorId, VenueId};
use crate::domains::dedup::plan::{MergePlan, MergeWrite};
use crate::domains::events::models::{Event, EventVendor};
use crate::domains::favorites::models::Favorite;
use crate::domains::promoters::models::Promoter;
use crate::domains::vendors::models::Vendor;
use crate::domains::venues::models::Venue;

use super::super::traits::{BaseCatalogStore, StoreError};

#[derive(Debug, Clone, Default)]
struct CatalogState {
    venues: Vec<Venue>,
    events: Vec<Event>,
    vendors: Vec<Vendor>,
    promoters: Vec<Promoter>,
    event_vendors: Vec<EventVendor>,
    favorites: Vec<Favorite>,
}

#[derive(Default)]
pub struct InMemoryCatalogStore {
    state: Mutex<CatalogState>,
    /// When set, `apply_merge` fails after this many writes have been
    /// applied to the working copy. The committed state must stay intact.
    fail_after_writes: Mutex<Option<usize>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a storage fault partway through the next merge.
    pub fn fail_after_writes(&self, writes: usize) {
        *self.fail_after_writes.lock().unwrap_or_else(|e| e.into_inner()) = Some(writes);
    }

    /// Clear any injected fault.
    pub fn clear_fault(&self) {
        *self.fail_after_writes.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn insert_venue(&self, venue: Venue) {
        self.lock().venues.push(venue);
    }

    pub fn insert_event(&self, event: Event) {
        self.lock().events.push(event);
    }

    pub fn insert_vendor(&self, vendor: Vendor) {
        self.lock().vendors.push(vendor);
    }

    pub fn insert_promoter(&self, promoter: Promoter) {
        self.lock().promoters.push(promoter);
    }

    pub fn insert_event_vendor(&self, row: EventVendor) {
        self.lock().event_vendors.push(row);
    }

    pub fn insert_favorite(&self, favorite: Favorite) {
        self.lock().favorites.push(favorite);
    }

    /// Snapshot of every participation row (test assertions).
    pub fn all_event_vendors(&self) -> Vec<EventVendor> {
        self.lock().event_vendors.clone()
    }

    /// Snapshot of every favorite row (test assertions).
    pub fn all_favorites(&self) -> Vec<Favorite> {
        self.lock().favorites.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        // A poisoned lock means a panic mid-mutation of a *copy*; the
        // committed state is still consistent, so keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Apply one write to a working copy of the state.
fn apply_write(state: &mut CatalogState, write: &MergeWrite) -> Result<(), StoreError> {
    match write {
        MergeWrite::RepointEventVenues { from, to } => {
            for event in state.events.iter_mut().filter(|e| e.venue_id == *from) {
                event.venue_id = *to;
            }
        }
        MergeWrite::RepointEventPromoters { from, to } => {
            for event in state.events.iter_mut().filter(|e| e.promoter_id == *from) {
                event.promoter_id = *to;
            }
        }
        MergeWrite::DeleteEventVendors { ids } => {
            let ids: HashSet<_> = ids.iter().collect();
            state.event_vendors.retain(|row| !ids.contains(&row.id));
        }
        MergeWrite::RepointEventVendorsByVendor { from, to } => {
            for row in state
                .event_vendors
                .iter_mut()
                .filter(|r| r.vendor_id == *from)
            {
                row.vendor_id = *to;
            }
        }
        MergeWrite::RepointEventVendorsByEvent { from, to } => {
            for row in state
                .event_vendors
                .iter_mut()
                .filter(|r| r.event_id == *from)
            {
                row.event_id = *to;
            }
        }
        MergeWrite::AddEventViews { event, views } => {
            let target = state
                .events
                .iter_mut()
                .find(|e| e.id == *event)
                .ok_or_else(|| StoreError::Conflict(format!("event {event} vanished mid-merge")))?;
            target.view_count += views;
        }
        MergeWrite::DeleteFavorites { ids } => {
            let ids: HashSet<_> = ids.iter().collect();
            state.favorites.retain(|f| !ids.contains(&f.id));
        }
        MergeWrite::RepointFavorites { kind, from, to } => {
            for favorite in state
                .favorites
                .iter_mut()
                .filter(|f| f.favoritable_kind == *kind && f.favoritable_id == *from)
            {
                favorite.favoritable_id = *to;
            }
        }
        MergeWrite::DeleteEntity { kind, id } => {
            let removed = match kind {
                EntityKind::Venue => remove_by(&mut state.venues, |v| v.id.into_uuid() == *id),
                EntityKind::Event => remove_by(&mut state.events, |e| e.id.into_uuid() == *id),
                EntityKind::Vendor => remove_by(&mut state.vendors, |v| v.id.into_uuid() == *id),
                EntityKind::Promoter => {
                    remove_by(&mut state.promoters, |p| p.id.into_uuid() == *id)
                }
            };
            if !removed {
                return Err(StoreError::Conflict(format!("{kind} {id} vanished mid-merge")));
            }
        }
    }
    Ok(())
}

fn remove_by<T>(items: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> bool {
    match items.iter().position(predicate) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

/// Re-check the catalog invariants a real database would enforce with
/// constraints. A violating plan must never commit.
fn check_invariants(state: &CatalogState) -> Result<(), StoreError> {
    let mut pairs = HashSet::new();
    for row in &state.event_vendors {
        if !pairs.insert((row.event_id, row.vendor_id)) {
            return Err(StoreError::Conflict(format!(
                "duplicate participation pair ({}, {})",
                row.event_id, row.vendor_id
            )));
        }
    }

    let mut triples = HashSet::new();
    for favorite in &state.favorites {
        let key = (favorite.user_id, favorite.target());
        if !triples.insert(key) {
            return Err(StoreError::Conflict(format!(
                "duplicate favorite for user {}",
                favorite.user_id
            )));
        }
    }

    let venue_ids: HashSet<_> = state.venues.iter().map(|v| v.id).collect();
    let promoter_ids: HashSet<_> = state.promoters.iter().map(|p| p.id).collect();
    for event in &state.events {
        if !venue_ids.contains(&event.venue_id) {
            return Err(StoreError::Conflict(format!(
                "event {} references missing venue {}",
                event.id, event.venue_id
            )));
        }
        if !promoter_ids.contains(&event.promoter_id) {
            return Err(StoreError::Conflict(format!(
                "event {} references missing promoter {}",
                event.id, event.promoter_id
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl BaseCatalogStore for InMemoryCatalogStore {
    async fn list_venues(&self) -> Result<Vec<Venue>, StoreError> {
        Ok(self.lock().venues.clone())
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.lock().events.clone())
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        Ok(self.lock().vendors.clone())
    }

    async fn list_promoters(&self) -> Result<Vec<Promoter>, StoreError> {
        Ok(self.lock().promoters.clone())
    }

    async fn find_venue(&self, id: VenueId) -> Result<Option<Venue>, StoreError> {
        Ok(self.lock().venues.iter().find(|v| v.id == id).cloned())
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.lock().events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_vendor(&self, id: VendorId) -> Result<Option<Vendor>, StoreError> {
        Ok(self.lock().vendors.iter().find(|v| v.id == id).cloned())
    }

    async fn find_promoter(&self, id: PromoterId) -> Result<Option<Promoter>, StoreError> {
        Ok(self.lock().promoters.iter().find(|p| p.id == id).cloned())
    }

    async fn events_for_venue(&self, id: VenueId) -> Result<Vec<Event>, StoreError> {
        Ok(self
            .lock()
            .events
            .iter()
            .filter(|e| e.venue_id == id)
            .cloned()
            .collect())
    }

    async fn events_for_promoter(&self, id: PromoterId) -> Result<Vec<Event>, StoreError> {
        Ok(self
            .lock()
            .events
            .iter()
            .filter(|e| e.promoter_id == id)
            .cloned()
            .collect())
    }

    async fn participations_for_vendor(
        &self,
        id: VendorId,
    ) -> Result<Vec<EventVendor>, StoreError> {
        Ok(self
            .lock()
            .event_vendors
            .iter()
            .filter(|r| r.vendor_id == id)
            .cloned()
            .collect())
    }

    async fn participations_for_event(&self, id: EventId) -> Result<Vec<EventVendor>, StoreError> {
        Ok(self
            .lock()
            .event_vendors
            .iter()
            .filter(|r| r.event_id == id)
            .cloned()
            .collect())
    }

    async fn favorites_for(
        &self,
        kind: EntityKind,
        target: Uuid,
    ) -> Result<Vec<Favorite>, StoreError> {
        Ok(self
            .lock()
            .favorites
            .iter()
            .filter(|f| f.favoritable_kind == kind && f.favoritable_id == target)
            .cloned()
            .collect())
    }

    async fn count_entities(&self, kind: EntityKind) -> Result<i64, StoreError> {
        let state = self.lock();
        let count = match kind {
            EntityKind::Venue => state.venues.len(),
            EntityKind::Event => state.events.len(),
            EntityKind::Vendor => state.vendors.len(),
            EntityKind::Promoter => state.promoters.len(),
        };
        Ok(count as i64)
    }

    async fn apply_merge(&self, plan: &MergePlan) -> Result<(), StoreError> {
        let fault = *self
            .fail_after_writes
            .lock()
            .map_err(|_| StoreError::Internal(anyhow!("fault flag lock poisoned")))?;

        let mut state = self.lock();
        let mut working = state.clone();

        for (index, write) in plan.writes.iter().enumerate() {
            if fault == Some(index) {
                return Err(StoreError::Internal(anyhow!(
                    "injected storage fault after {index} writes"
                )));
            }
            apply_write(&mut working, write)?;
        }

        check_invariants(&working)?;

        // Commit: nothing above touched the shared state.
        *state = working;
        Ok(())
    }
}
