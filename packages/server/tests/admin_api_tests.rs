//! HTTP-level tests for the admin dedup endpoints.
//!
//! Drives the real router (auth middleware included) with `oneshot`
//! requests over the in-memory store. The pool is lazy and never connects;
//! nothing here touches a database.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{event, favorite, promoter, vendor, venue};
use serde_json::{json, Value};
use server_core::common::{EntityKind, UserId};
use server_core::kernel::{BaseCatalogStore, InMemoryCatalogStore, TokenAuthorizer};
use server_core::server::build_app_with;
use sqlx::PgPool;
use tower::ServiceExt;

const ADMIN_TOKEN: &str = "test-admin-token";

fn test_app(store: Arc<InMemoryCatalogStore>) -> Router {
    let pool = PgPool::connect_lazy("postgres://localhost/unused").expect("lazy pool");
    let authorizer = Arc::new(TokenAuthorizer::new([ADMIN_TOKEN.to_string()]));
    build_app_with(pool, store, authorizer)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

fn post_json(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_duplicates_requires_admin_token() {
    let app = test_app(Arc::new(InMemoryCatalogStore::new()));

    let response = app
        .clone()
        .oneshot(get("/admin/duplicates?type=venues", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/admin/duplicates?type=venues", Some("wrong-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "admin access required");
}

#[tokio::test]
async fn test_merge_requires_admin_token() {
    let app = test_app(Arc::new(InMemoryCatalogStore::new()));

    let request = Request::builder()
        .method("POST")
        .uri("/admin/merge")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "type": "venues",
                "primaryId": uuid::Uuid::new_v4(),
                "duplicateId": uuid::Uuid::new_v4(),
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Input validation
// ============================================================================

#[tokio::test]
async fn test_duplicates_rejects_unknown_type() {
    let app = test_app(Arc::new(InMemoryCatalogStore::new()));

    let response = app
        .oneshot(get("/admin/duplicates?type=users", Some(ADMIN_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("users"));
}

#[tokio::test]
async fn test_duplicates_rejects_out_of_range_threshold() {
    let app = test_app(Arc::new(InMemoryCatalogStore::new()));

    for bad in ["-0.5", "1.5"] {
        let response = app
            .clone()
            .oneshot(get(
                &format!("/admin/duplicates?type=venues&threshold={bad}"),
                Some(ADMIN_TOKEN),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_merge_rejects_self_merge() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let v = venue("Fairgrounds");
    store.insert_venue(v.clone());
    let app = test_app(store);

    let response = app
        .oneshot(post_json(
            "/admin/merge",
            ADMIN_TOKEN,
            json!({
                "type": "venues",
                "primaryId": v.id.into_uuid(),
                "duplicateId": v.id.into_uuid(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Duplicate scanning
// ============================================================================

#[tokio::test]
async fn test_duplicates_returns_ranked_pairs() {
    let store = Arc::new(InMemoryCatalogStore::new());
    store.insert_vendor(vendor("Smith Concessions"));
    store.insert_vendor(vendor("Smith's Concessions"));
    store.insert_vendor(vendor("Totally Different Rentals"));
    let app = test_app(store);

    let response = app
        .oneshot(get(
            "/admin/duplicates?type=vendors&threshold=0.5",
            Some(ADMIN_TOKEN),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let pairs = body.as_array().expect("array of pairs");
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["entity1"]["name"], "Smith Concessions");
    assert_eq!(pairs[0]["entity2"]["name"], "Smith's Concessions");
    assert!(pairs[0]["similarity"].as_f64().unwrap() >= 0.5);
    // The comparison string is an internal detail, never serialized.
    assert!(pairs[0]["entity1"].get("comparisonString").is_none());
}

// ============================================================================
// Merge preview and execution
// ============================================================================

#[tokio::test]
async fn test_merge_preview_reports_transfer_counts() {
    let store = Arc::new(InMemoryCatalogStore::new());
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
    let app = test_app(store);

    let uri = format!(
        "/admin/merge-preview?type=venues&primaryId={}&duplicateId={}",
        primary.id, duplicate.id
    );
    let response = app.oneshot(get(&uri, Some(ADMIN_TOKEN))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["canMerge"], true);
    assert_eq!(body["relationshipsToTransfer"]["events"], 1);
    assert_eq!(body["relationshipsToTransfer"]["favorites"], 1);
    assert_eq!(body["primary"]["kind"], "venue");
    assert_eq!(body["primary"]["name"], "County Fairgrounds");
}

#[tokio::test]
async fn test_merge_preview_unknown_id_is_404() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let v = venue("Fairgrounds");
    store.insert_venue(v.clone());
    let app = test_app(store);

    let uri = format!(
        "/admin/merge-preview?type=venues&primaryId={}&duplicateId={}",
        v.id,
        uuid::Uuid::new_v4()
    );
    let response = app.oneshot(get(&uri, Some(ADMIN_TOKEN))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_merge_executes_and_is_not_repeatable() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let primary = venue("County Fairgrounds");
    let duplicate = venue("County Fair Grounds");
    let host = promoter("Fair Board");
    store.insert_venue(primary.clone());
    store.insert_venue(duplicate.clone());
    store.insert_promoter(host.clone());
    store.insert_event(event("Spring Fair", duplicate.id, host.id));
    let app = test_app(store.clone());

    let body = json!({
        "type": "venues",
        "primaryId": primary.id.into_uuid(),
        "duplicateId": duplicate.id.into_uuid(),
    });

    let response = app
        .clone()
        .oneshot(post_json("/admin/merge", ADMIN_TOKEN, body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result = body_json(response).await;
    assert_eq!(result["mergedDuplicateId"], duplicate.id.to_string());
    assert_eq!(result["transferredRelationships"]["events"], 1);
    assert_eq!(result["primary"]["name"], "County Fairgrounds");

    // The duplicate is gone, so replaying the same request is a 404.
    let response = app
        .oneshot(post_json("/admin/merge", ADMIN_TOKEN, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(store.events_for_venue(primary.id).await.unwrap().len(), 1);
}
