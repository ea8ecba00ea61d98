//! JSON envelope shared by every endpoint and the error-kind to status table.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::ids::InvalidId;
use crate::storage::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failed,
}

/// Payload for envelopes that carry nothing besides status and message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Empty {}

/// `{"status": ..., "message": ..., ...payload}`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T = Empty> {
    pub status: Outcome,
    pub message: String,
    #[serde(flatten)]
    pub payload: T,
}

impl Envelope<Empty> {
    pub fn success(message: impl Into<String>) -> Self {
        Self::success_with(message, Empty {})
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Outcome::Failed,
            message: message.into(),
            payload: Empty {},
        }
    }
}

impl<T> Envelope<T> {
    pub fn success_with(message: impl Into<String>, payload: T) -> Self {
        Self {
            status: Outcome::Success,
            message: message.into(),
            payload,
        }
    }
}

/// Every way a request can fail, rendered as a failed envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    MalformedBody(String),
    #[error(transparent)]
    InvalidId(#[from] InvalidId),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Storage(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_)
            | ApiError::InvalidId(_)
            | ApiError::Validation(_)
            | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }
        (status, Json(Envelope::failed(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::MalformedBody(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::MalformedBody(value.body_text())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound(value.to_string()),
            RepositoryError::Conflict => Self::Conflict(value.to_string()),
            RepositoryError::Unavailable(_) => Self::Storage(value.to_string()),
        }
    }
}
