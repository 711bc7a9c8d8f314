//! HTTP route handlers.

pub mod prompts;

use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use promptshelf_core::{ErrorKind, PromptShelfError};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// All `/api` routes, ready to be nested by the caller.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/prompts", get(prompts::list).post(prompts::create))
        .route("/prompts/search", get(prompts::search))
        .route("/prompts/export", get(prompts::export))
        .route("/prompts/import", post(prompts::import))
        .route(
            "/prompts/{id}",
            get(prompts::get).put(prompts::update).delete(prompts::delete),
        )
        .route("/prompts/{id}/history", get(prompts::history))
        .route("/prompts/{id}/revert/{version_id}", post(prompts::revert))
        .route("/prompts/{id}/logusage", post(prompts::log_usage))
        .route("/prompts/{id}/favorite", post(prompts::toggle_favorite))
        .route("/health", get(health))
}

/// JSON error body: `{"error": <kind>, "message": <text>}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorKind,
    pub message: String,
}

/// A store error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub PromptShelfError);

impl From<PromptShelfError> for ApiError {
    fn from(e: PromptShelfError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PromptShelfError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(PromptShelfError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(PromptShelfError::Validation(rejection.body_text()))
    }
}

/// `Json` body extractor whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejections use the API error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `Query` extractor whose rejections use the API error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::Format => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        if kind == ErrorKind::Persistence {
            tracing::error!(target: "promptshelf::api", "Request failed: {}", self.0);
        } else {
            tracing::debug!(target: "promptshelf::api", "Request rejected ({}): {}", kind.as_str(), self.0);
        }
        let body = ErrorBody {
            error: kind,
            message: self.0.to_string(),
        };
        (status_for(kind), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_kind_has_a_distinct_meaning() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Format), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Persistence), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
