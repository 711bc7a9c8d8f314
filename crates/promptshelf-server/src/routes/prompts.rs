//! Prompt Library routes.
//!
//! Thin wrappers over [`PromptStore`](promptshelf_core::PromptStore): each
//! handler takes the store lock, runs one operation and serializes the result.

use super::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use promptshelf_types::{
    ExportedPrompt, HistoryEntry, ImportSummary, NewPrompt, PromptPatch, PromptRecord, SearchQuery,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Response for a deleted prompt.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub id: u64,
    pub message: &'static str,
}

/// GET /api/prompts - All prompts in stored order.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<PromptRecord>> {
    Json(state.store.lock().await.list())
}

/// POST /api/prompts - Create a prompt.
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(new): ApiJson<NewPrompt>,
) -> Result<(StatusCode, Json<PromptRecord>), ApiError> {
    let record = state.store.lock().await.create(new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/prompts/search?q=&tag=&tool= - Filter prompts.
pub async fn search(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Json<Vec<PromptRecord>> {
    Json(state.store.lock().await.search(&query))
}

/// GET /api/prompts/export - Content-only copy of every prompt.
pub async fn export(State(state): State<Arc<AppState>>) -> Json<Vec<ExportedPrompt>> {
    Json(state.store.lock().await.export())
}

/// POST /api/prompts/import - Create prompts from an exported array.
pub async fn import(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<Value>,
) -> ApiResult<ImportSummary> {
    let summary = state.store.lock().await.import(&payload)?;
    Ok(Json(summary))
}

/// GET /api/prompts/{id}
pub async fn get(State(state): State<Arc<AppState>>, ApiPath(id): ApiPath<u64>) -> ApiResult<PromptRecord> {
    Ok(Json(state.store.lock().await.get(id)?))
}

/// PUT /api/prompts/{id} - Partial update; absent fields are kept.
pub async fn update(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<PromptPatch>,
) -> ApiResult<PromptRecord> {
    Ok(Json(state.store.lock().await.update(id, patch)?))
}

/// DELETE /api/prompts/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<DeleteResponse> {
    state.store.lock().await.delete(id)?;
    Ok(Json(DeleteResponse {
        id,
        message: "Prompt deleted successfully",
    }))
}

/// GET /api/prompts/{id}/history - Most recent first.
pub async fn history(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<Vec<HistoryEntry>> {
    Ok(Json(state.store.lock().await.history(id)?))
}

/// POST /api/prompts/{id}/revert/{version_id}
pub async fn revert(
    State(state): State<Arc<AppState>>,
    ApiPath((id, version_id)): ApiPath<(u64, String)>,
) -> ApiResult<PromptRecord> {
    Ok(Json(state.store.lock().await.revert(id, &version_id)?))
}

/// POST /api/prompts/{id}/logusage
pub async fn log_usage(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<PromptRecord> {
    Ok(Json(state.store.lock().await.log_usage(id)?))
}

/// POST /api/prompts/{id}/favorite
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<PromptRecord> {
    Ok(Json(state.store.lock().await.toggle_favorite(id)?))
}
