//! API request handlers

use super::models::{DeleteQuery, DeleteResponse, HealthResponse};
use super::routes::AppState;
use crate::error::JanitorError;
use crate::inventory::{InventorySummary, ModelFilter, summarize};
use crate::models::ModelGroup;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

/// GET /health - Service health check
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now(),
        }),
    )
}

/// GET /metrics - Prometheus metrics
pub async fn metrics(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

/// GET /models - Scan all caches, optionally filtered by `source` and `q`
pub async fn list_models(
    State(state): State<AppState>,
    Query(filter): Query<ModelFilter>,
) -> Json<Vec<ModelGroup>> {
    let groups = state.inventory.scan_all().await;
    Json(filter.apply(groups))
}

/// GET /models/summary - Totals across all caches
pub async fn summary(State(state): State<AppState>) -> Json<InventorySummary> {
    let groups = state.inventory.scan_all().await;
    Json(summarize(&groups))
}

/// POST /models/delete - Delete a previously listed model group
///
/// Always 200; `deleted` reports whether every file was removed.
pub async fn delete_model(
    State(state): State<AppState>,
    Json(group): Json<ModelGroup>,
) -> Json<DeleteResponse> {
    let deleted = state.inventory.delete(&group).await;
    Json(DeleteResponse { deleted })
}

/// DELETE /models?id=&source= - Rescan and delete the model with this id
///
/// 409 when the id names a repository cached by both layouts and no
/// `source` was given.
pub async fn delete_model_by_id(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, JanitorError> {
    if query.id.is_empty() {
        return Err(JanitorError::BadRequest {
            message: "id cannot be empty".to_string(),
        });
    }

    state.inventory.delete_by_id(&query.id, query.source).await?;

    Ok(StatusCode::NO_CONTENT)
}
