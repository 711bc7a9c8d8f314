//! Error types for PromptShelf.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptShelfError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(u64),

    #[error("Version {version_id} not found for prompt {id}")]
    VersionNotFound { id: u64, version_id: String },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Failed to write {}: {source}", path.display())]
    PersistenceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode prompt collection: {0}")]
    PersistenceJson(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Stable classification of [`PromptShelfError`] for callers that map
/// failures to an outward status without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Format,
    Persistence,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Format => "format",
            ErrorKind::Persistence => "persistence",
        }
    }
}

impl PromptShelfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromptShelfError::Validation(_) => ErrorKind::Validation,
            PromptShelfError::PromptNotFound(_) | PromptShelfError::VersionNotFound { .. } => {
                ErrorKind::NotFound
            }
            PromptShelfError::Format(_) => ErrorKind::Format,
            PromptShelfError::PersistenceIo { .. }
            | PromptShelfError::PersistenceJson(_)
            | PromptShelfError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}
