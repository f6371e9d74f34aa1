//! Error types and their API responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Library error type
#[derive(Debug, Error)]
pub enum JanitorError {
    #[error("Model not found: {id}")]
    ModelNotFound { id: String },

    #[error("Model id {id} exists in more than one cache; choose a source")]
    AmbiguousId { id: String },

    #[error("Failed to delete model: {id}")]
    DeletionFailed { id: String },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

pub type JanitorResult<T> = Result<T, JanitorError>;

impl JanitorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::ModelNotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::AmbiguousId { .. } => StatusCode::CONFLICT,
            Self::DeletionFailed { .. } | Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for JanitorError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            timestamp: chrono::Utc::now(),
        });

        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}
