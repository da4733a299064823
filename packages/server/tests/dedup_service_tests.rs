//! Integration tests for duplicate detection and merge execution.
//!
//! Runs the full service pipeline (load, plan, apply, re-read) against the
//! in-memory store, including the rollback path via injected faults.

mod common;

use std::collections::HashSet;

use common::{dedup_service, event, favorite, participation, promoter, vendor, venue};
use server_core::common::{EntityKind, UserId};
use server_core::domains::dedup::DedupError;
use server_core::kernel::BaseCatalogStore;

// ============================================================================
// Duplicate scanning
// ============================================================================

#[tokio::test]
async fn test_find_duplicates_ranks_by_similarity() {
    let (store, service) = dedup_service();

    store.insert_venue(venue("County Fairgrounds"));
    store.insert_venue(venue("County Fair Grounds"));
    store.insert_venue(venue("The County Fairgrounds"));
    store.insert_venue(venue("Downtown Arena"));

    let pairs = service
        .find_duplicates(EntityKind::Venue, 0.2)
        .await
        .expect("scan failed");

    assert!(!pairs.is_empty());
    // Descending similarity, and the unrelated venue never pairs up.
    for window in pairs.windows(2) {
        assert!(window[0].similarity >= window[1].similarity);
    }
    for pair in &pairs {
        assert_ne!(pair.entity1.name, "Downtown Arena");
        assert_ne!(pair.entity2.name, "Downtown Arena");
    }
}

#[tokio::test]
async fn test_find_duplicates_rejects_bad_threshold() {
    let (_store, service) = dedup_service();

    for bad in [-0.1, 1.5, f64::NAN] {
        let err = service
            .find_duplicates(EntityKind::Venue, bad)
            .await
            .unwrap_err();
        assert!(matches!(err, DedupError::InvalidThreshold(_)));
    }
}

#[tokio::test]
async fn test_find_duplicates_empty_catalog() {
    let (_store, service) = dedup_service();

    let pairs = service
        .find_duplicates(EntityKind::Promoter, 0.5)
        .await
        .expect("scan failed");
    assert!(pairs.is_empty());
}

// ============================================================================
// Venue merge
// ============================================================================

#[tokio::test]
async fn test_venue_merge_repoints_events_and_favorites() {
    let (store, service) = dedup_service();

    let primary = venue("County Fairgrounds");
    let duplicate = venue("County Fair Grounds");
    let host = promoter("Fair Board");
    store.insert_venue(primary.clone());
    store.insert_venue(duplicate.clone());
    store.insert_promoter(host.clone());

    // Two events at the duplicate venue, one at the primary.
    store.insert_event(event("Spring Fair", duplicate.id, host.id));
    store.insert_event(event("Fall Fair", duplicate.id, host.id));
    store.insert_event(event("Winter Market", primary.id, host.id));

    // One favorite on each venue, different users (no collision).
    store.insert_favorite(favorite(
        UserId::new(),
        EntityKind::Venue,
        duplicate.id.into_uuid(),
    ));
    store.insert_favorite(favorite(
        UserId::new(),
        EntityKind::Venue,
        primary.id.into_uuid(),
    ));

    let preview = service
        .merge_preview(
            EntityKind::Venue,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("preview failed");
    assert!(preview.can_merge);
    assert_eq!(preview.relationships_to_transfer.events, Some(2));
    assert_eq!(preview.relationships_to_transfer.favorites, 1);

    let result = service
        .execute_merge(
            EntityKind::Venue,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("merge failed");
    assert_eq!(result.merged_duplicate_id, duplicate.id.into_uuid());
    assert_eq!(result.transferred_relationships.events, Some(2));

    // Duplicate is gone; every event now points at the primary.
    assert_eq!(store.count_entities(EntityKind::Venue).await.unwrap(), 1);
    let events = store.events_for_venue(primary.id).await.unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(
        store
            .favorites_for(EntityKind::Venue, primary.id.into_uuid())
            .await
            .unwrap()
            .len(),
        2
    );
}

// ============================================================================
// Vendor merge (join-row conflict handling)
// ============================================================================

#[tokio::test]
async fn test_vendor_merge_resolves_participation_overlap() {
    let (store, service) = dedup_service();

    let site = venue("Fairgrounds");
    let host = promoter("Fair Board");
    store.insert_venue(site.clone());
    store.insert_promoter(host.clone());

    let e1 = event("Event 1", site.id, host.id);
    let e2 = event("Event 2", site.id, host.id);
    let e3 = event("Event 3", site.id, host.id);
    store.insert_event(e1.clone());
    store.insert_event(e2.clone());
    store.insert_event(e3.clone());

    // Primary participates in E1 and E2; duplicate in E1 and E3.
    let primary = vendor("Smith Concessions");
    let duplicate = vendor("Smith's Concessions");
    store.insert_vendor(primary.clone());
    store.insert_vendor(duplicate.clone());
    store.insert_event_vendor(participation(e1.id, primary.id));
    store.insert_event_vendor(participation(e2.id, primary.id));
    store.insert_event_vendor(participation(e1.id, duplicate.id));
    store.insert_event_vendor(participation(e3.id, duplicate.id));

    let preview = service
        .merge_preview(
            EntityKind::Vendor,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("preview failed");
    // Only the non-colliding E3 row transfers; the E1 overlap is dropped.
    assert_eq!(preview.relationships_to_transfer.event_vendors, Some(1));
    assert!(preview
        .warnings
        .iter()
        .any(|w| w.contains("1") && w.to_lowercase().contains("event")));

    service
        .execute_merge(
            EntityKind::Vendor,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("merge failed");

    // Primary participates in exactly E1, E2, E3 with no duplicate pairs.
    let rows = store.participations_for_vendor(primary.id).await.unwrap();
    let events: HashSet<_> = rows.iter().map(|r| r.event_id).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(events, HashSet::from([e1.id, e2.id, e3.id]));
    assert_eq!(store.count_entities(EntityKind::Vendor).await.unwrap(), 1);
    assert!(store
        .participations_for_vendor(duplicate.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_event_merge_resolves_vendor_overlap() {
    let (store, service) = dedup_service();

    let site = venue("Fairgrounds");
    let host = promoter("Fair Board");
    store.insert_venue(site.clone());
    store.insert_promoter(host.clone());

    let primary = event("Harvest Festival", site.id, host.id);
    let duplicate = event("Harvest Festival 2025", site.id, host.id);
    store.insert_event(primary.clone());
    store.insert_event(duplicate.clone());

    // Vendor V1 is listed by both events; V2 only by the duplicate.
    let v1 = vendor("Smith Concessions");
    let v2 = vendor("Acme Rentals");
    store.insert_vendor(v1.clone());
    store.insert_vendor(v2.clone());
    store.insert_event_vendor(participation(primary.id, v1.id));
    store.insert_event_vendor(participation(duplicate.id, v1.id));
    store.insert_event_vendor(participation(duplicate.id, v2.id));

    let preview = service
        .merge_preview(
            EntityKind::Event,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("preview failed");
    // Only V2's row transfers; the V1 overlap is dropped.
    assert_eq!(preview.relationships_to_transfer.event_vendors, Some(1));
    assert!(preview
        .warnings
        .iter()
        .any(|w| w.contains("1") && w.to_lowercase().contains("vendor")));

    service
        .execute_merge(
            EntityKind::Event,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("merge failed");

    // The primary lists exactly V1 and V2, once each; no row anywhere in
    // the join table still references the deleted duplicate.
    let rows = store.participations_for_event(primary.id).await.unwrap();
    let vendors: HashSet<_> = rows.iter().map(|r| r.vendor_id).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(vendors, HashSet::from([v1.id, v2.id]));

    let all_rows = store.all_event_vendors();
    assert_eq!(all_rows.len(), 2);
    let pairs: HashSet<_> = all_rows.iter().map(|r| (r.event_id, r.vendor_id)).collect();
    assert_eq!(pairs.len(), all_rows.len(), "no duplicate participation pairs");
    assert!(all_rows.iter().all(|r| r.event_id == primary.id));
    assert_eq!(store.count_entities(EntityKind::Event).await.unwrap(), 1);
}

// ============================================================================
// Event merge (view counters)
// ============================================================================

#[tokio::test]
async fn test_event_merge_adds_view_counts() {
    let (store, service) = dedup_service();

    let site = venue("Fairgrounds");
    let host = promoter("Fair Board");
    store.insert_venue(site.clone());
    store.insert_promoter(host.clone());

    let mut primary = event("Harvest Festival", site.id, host.id);
    primary.view_count = 120;
    let mut duplicate = event("Harvest Festival 2025", site.id, host.id);
    duplicate.view_count = 45;
    store.insert_event(primary.clone());
    store.insert_event(duplicate.clone());

    let result = service
        .execute_merge(
            EntityKind::Event,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("merge failed");

    // View counts are additive; the result reflects post-merge state.
    let merged = store.find_event(primary.id).await.unwrap().unwrap();
    assert_eq!(merged.view_count, 165);
    assert_eq!(result.primary.as_event().unwrap().view_count, 165);
    assert_eq!(store.count_entities(EntityKind::Event).await.unwrap(), 1);
}

// ============================================================================
// Favorites collision
// ============================================================================

#[tokio::test]
async fn test_merge_drops_colliding_favorites() {
    let (store, service) = dedup_service();

    let primary = promoter("Valley Events");
    let duplicate = promoter("Valley Events LLC");
    store.insert_promoter(primary.clone());
    store.insert_promoter(duplicate.clone());

    // One user favorites both records; another favorites only the duplicate.
    let both = UserId::new();
    store.insert_favorite(favorite(both, EntityKind::Promoter, primary.id.into_uuid()));
    store.insert_favorite(favorite(
        both,
        EntityKind::Promoter,
        duplicate.id.into_uuid(),
    ));
    store.insert_favorite(favorite(
        UserId::new(),
        EntityKind::Promoter,
        duplicate.id.into_uuid(),
    ));

    let preview = service
        .merge_preview(
            EntityKind::Promoter,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("preview failed");
    // The colliding favorite is dropped, not transferred.
    assert_eq!(preview.relationships_to_transfer.favorites, 1);

    service
        .execute_merge(
            EntityKind::Promoter,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("merge failed");

    let favorites = store
        .favorites_for(EntityKind::Promoter, primary.id.into_uuid())
        .await
        .unwrap();
    assert_eq!(favorites.len(), 2);
    let users: HashSet<_> = favorites.iter().map(|f| f.user_id).collect();
    assert_eq!(users.len(), 2, "one favorite per user after the merge");

    // The colliding row was deleted outright, not left pointing anywhere.
    assert_eq!(store.all_favorites().len(), 2);
}

// ============================================================================
// Validation and not-found
// ============================================================================

#[tokio::test]
async fn test_self_merge_is_rejected() {
    let (store, service) = dedup_service();
    let v = venue("Fairgrounds");
    store.insert_venue(v.clone());

    let err = service
        .merge_preview(EntityKind::Venue, v.id.into_uuid(), v.id.into_uuid())
        .await
        .unwrap_err();
    assert!(matches!(err, DedupError::SelfMerge));

    let err = service
        .execute_merge(EntityKind::Venue, v.id.into_uuid(), v.id.into_uuid())
        .await
        .unwrap_err();
    assert!(matches!(err, DedupError::SelfMerge));
}

#[tokio::test]
async fn test_merge_unknown_id_is_not_found() {
    let (store, service) = dedup_service();
    let v = venue("Fairgrounds");
    store.insert_venue(v.clone());

    let err = service
        .merge_preview(EntityKind::Venue, v.id.into_uuid(), uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DedupError::NotFound { .. }));
}

// ============================================================================
// Atomicity
// ============================================================================

#[tokio::test]
async fn test_failed_merge_leaves_catalog_untouched_and_is_retryable() {
    let (store, service) = dedup_service();

    let primary = venue("County Fairgrounds");
    let duplicate = venue("County Fair Grounds");
    let host = promoter("Fair Board");
    store.insert_venue(primary.clone());
    store.insert_venue(duplicate.clone());
    store.insert_promoter(host.clone());
    store.insert_event(event("Spring Fair", duplicate.id, host.id));
    store.insert_favorite(favorite(
        UserId::new(),
        EntityKind::Venue,
        duplicate.id.into_uuid(),
    ));

    // Fail after the first write: the event repoint lands on the working
    // copy but the plan never commits.
    store.fail_after_writes(1);
    let err = service
        .execute_merge(
            EntityKind::Venue,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DedupError::MergeFailed(_)));

    // Nothing changed: duplicate still present, its event still attached.
    assert_eq!(store.count_entities(EntityKind::Venue).await.unwrap(), 2);
    assert_eq!(store.events_for_venue(duplicate.id).await.unwrap().len(), 1);
    assert_eq!(
        store
            .favorites_for(EntityKind::Venue, duplicate.id.into_uuid())
            .await
            .unwrap()
            .len(),
        1
    );

    // Retry after the fault clears; the whole merge applies.
    store.clear_fault();
    service
        .execute_merge(
            EntityKind::Venue,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .expect("retry failed");
    assert_eq!(store.count_entities(EntityKind::Venue).await.unwrap(), 1);
    assert_eq!(store.events_for_venue(primary.id).await.unwrap().len(), 1);

    // A second retry now fails fast: the duplicate no longer resolves.
    let err = service
        .execute_merge(
            EntityKind::Venue,
            primary.id.into_uuid(),
            duplicate.id.into_uuid(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DedupError::NotFound { .. }));
}
