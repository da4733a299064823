//! Shared fixtures for integration tests.
//!
//! Everything runs against the in-memory store; no database required.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use server_core::common::{
    EntityKind, EventId, EventVendorId, FavoriteId, PromoterId, UserId, VendorId, VenueId,
};
use server_core::domains::dedup::DedupService;
use server_core::domains::events::models::{Event, EventVendor};
use server_core::domains::favorites::models::Favorite;
use server_core::domains::promoters::models::Promoter;
use server_core::domains::vendors::models::Vendor;
use server_core::domains::venues::models::Venue;
use server_core::kernel::InMemoryCatalogStore;
use uuid::Uuid;

pub fn venue(name: &str) -> Venue {
    Venue {
        id: VenueId::new(),
        name: name.to_string(),
        address: None,
        city: None,
        state: None,
        zip: None,
        latitude: None,
        longitude: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn event(name: &str, venue_id: VenueId, promoter_id: PromoterId) -> Event {
    Event {
        id: EventId::new(),
        name: name.to_string(),
        description: None,
        venue_id,
        promoter_id,
        start_date: Utc::now(),
        end_date: None,
        admission_price: None,
        view_count: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn vendor(business_name: &str) -> Vendor {
    Vendor {
        id: VendorId::new(),
        business_name: business_name.to_string(),
        vendor_type: None,
        description: None,
        user_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn promoter(company_name: &str) -> Promoter {
    Promoter {
        id: PromoterId::new(),
        company_name: company_name.to_string(),
        description: None,
        user_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn participation(event_id: EventId, vendor_id: VendorId) -> EventVendor {
    EventVendor {
        id: EventVendorId::new(),
        event_id,
        vendor_id,
        created_at: Utc::now(),
    }
}

pub fn favorite(user_id: UserId, kind: EntityKind, target: Uuid) -> Favorite {
    Favorite {
        id: FavoriteId::new(),
        user_id,
        favoritable_kind: kind,
        favoritable_id: target,
        created_at: Utc::now(),
    }
}

/// A dedup service wired to a fresh in-memory store, plus a handle onto the
/// store for seeding and assertions.
pub fn dedup_service() -> (Arc<InMemoryCatalogStore>, DedupService) {
    let store = Arc::new(InMemoryCatalogStore::new());
    let service = DedupService::new(store.clone());
    (store, service)
}
