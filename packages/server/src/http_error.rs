//! HTTP error handling
//!
//! Provides consistent `{message, code, details}` error responses and the
//! mapping from engine errors to them.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use nestedset_core::services::NestedSetError;
use serde::{Deserialize, Serialize};

/// HTTP error response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// Status code for this error's code
    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NODE_NOT_FOUND" | "ROOT_NOT_FOUND" => StatusCode::NOT_FOUND,
            "INVALID_PARENT" | "CONFLICT" | "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<NestedSetError> for HttpError {
    fn from(err: NestedSetError) -> Self {
        match err {
            NestedSetError::NodeNotFound { .. } => HttpError::new(err.to_string(), "NODE_NOT_FOUND"),
            NestedSetError::RootNotFound => HttpError::new(err.to_string(), "ROOT_NOT_FOUND"),
            NestedSetError::InvalidParent { .. } => {
                HttpError::new("Parent node does not exist", "INVALID_PARENT")
            }
            NestedSetError::RootAlreadyExists
            | NestedSetError::CircularMove { .. }
            | NestedSetError::MultipleRoots { .. } => HttpError::new(err.to_string(), "CONFLICT"),
            NestedSetError::Validation(message) => HttpError::new(message, "VALIDATION_ERROR"),
            NestedSetError::Storage(_) | NestedSetError::IntegrityViolation(_) => {
                tracing::error!("Storage failure: {:?}", err);
                HttpError::with_details("Database operation failed", "DATABASE_ERROR", err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::with_details("Invalid request body", "VALIDATION_ERROR", rejection.body_text())
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        HttpError::with_details("Invalid path parameter", "VALIDATION_ERROR", rejection.body_text())
    }
}
