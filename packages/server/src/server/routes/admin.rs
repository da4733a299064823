//! Administrative dedup/merge endpoints.
//!
//! Three operations: scan a kind for candidate pairs, preview a merge, and
//! execute one. Input validation happens here (closed `type` set, threshold
//! range); everything past that point is the dedup service's contract.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::common::EntityKind;
use crate::domains::dedup::{
    DedupError, DuplicateCandidate, DuplicatePair, MergePreview, MergeResult,
    DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct DuplicatesQuery {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePreviewQuery {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub primary_id: Uuid,
    pub duplicate_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub primary_id: Uuid,
    pub duplicate_id: Uuid,
}

fn parse_kind(entity_type: &str) -> Result<EntityKind, DedupError> {
    EntityKind::parse_route_key(entity_type)
        .ok_or_else(|| DedupError::InvalidEntityType(entity_type.to_string()))
}

/// GET /admin/duplicates?type=venues&threshold=0.7
pub async fn find_duplicates_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<DuplicatesQuery>,
) -> Result<Json<Vec<DuplicatePair<DuplicateCandidate>>>, DedupError> {
    let kind = parse_kind(&params.entity_type)?;
    let threshold = params.threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);
    let pairs = state.dedup.find_duplicates(kind, threshold).await?;
    Ok(Json(pairs))
}

/// GET /admin/merge-preview?type=venues&primaryId=...&duplicateId=...
pub async fn merge_preview_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<MergePreviewQuery>,
) -> Result<Json<MergePreview>, DedupError> {
    let kind = parse_kind(&params.entity_type)?;
    let preview = state
        .dedup
        .merge_preview(kind, params.primary_id, params.duplicate_id)
        .await?;
    Ok(Json(preview))
}

/// POST /admin/merge {"type": "venues", "primaryId": ..., "duplicateId": ...}
pub async fn execute_merge_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<MergeRequest>,
) -> Result<Json<MergeResult>, DedupError> {
    let kind = parse_kind(&body.entity_type)?;
    let result = state
        .dedup
        .execute_merge(kind, body.primary_id, body.duplicate_id)
        .await?;
    Ok(Json(result))
}

impl IntoResponse for DedupError {
    fn into_response(self) -> Response {
        let status = match &self {
            DedupError::InvalidEntityType(_)
            | DedupError::InvalidThreshold(_)
            | DedupError::SelfMerge => StatusCode::BAD_REQUEST,
            DedupError::NotFound { .. } => StatusCode::NOT_FOUND,
            DedupError::MergeFailed(_) => StatusCode::CONFLICT,
            DedupError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Dedup endpoint failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
