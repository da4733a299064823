//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::dedup::DedupService;
use crate::kernel::{BaseAuthorizer, BaseCatalogStore, PostgresCatalogStore, TokenAuthorizer};
use crate::server::middleware::admin_auth_middleware;
use crate::server::routes::{
    execute_merge_handler, find_duplicates_handler, health_handler, merge_preview_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub dedup: Arc<DedupService>,
    pub authorizer: Arc<dyn BaseAuthorizer>,
}

/// Build the Axum application router over Postgres-backed storage.
pub fn build_app(pool: PgPool, admin_api_tokens: Vec<String>) -> Router {
    let store: Arc<dyn BaseCatalogStore> = Arc::new(PostgresCatalogStore::new(pool.clone()));
    let authorizer: Arc<dyn BaseAuthorizer> = Arc::new(TokenAuthorizer::new(admin_api_tokens));
    build_app_with(pool, store, authorizer)
}

/// Build the router with explicit storage/authorizer implementations.
/// Tests inject the in-memory store and a mock authorizer here.
pub fn build_app_with(
    pool: PgPool,
    store: Arc<dyn BaseCatalogStore>,
    authorizer: Arc<dyn BaseAuthorizer>,
) -> Router {
    let app_state = AppState {
        db_pool: pool,
        dedup: Arc::new(DedupService::new(store)),
        authorizer: authorizer.clone(),
    };

    // CORS: the admin UI is served from a separate origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Admin routes reject non-administrative callers before any work runs
    let admin_routes = Router::new()
        .route("/admin/duplicates", get(find_duplicates_handler))
        .route("/admin/merge-preview", get(merge_preview_handler))
        .route("/admin/merge", post(execute_merge_handler))
        .layer(middleware::from_fn(move |req, next| {
            admin_auth_middleware(authorizer.clone(), req, next)
        }));

    Router::new()
        .merge(admin_routes)
        // Health check (no auth)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
