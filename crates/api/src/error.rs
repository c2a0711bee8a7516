//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Each variant belongs to an
//! [`ErrorKind`]; client-side kinds answer `400 Bad Request` with a body of
//! `{"error": "<kind>"}` and are logged at debug level, while server-side
//! failures answer `500` and are captured to Sentry.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body missing, not JSON, or a falsy JSON value.
    #[error("Request body is empty")]
    EmptyBody,

    /// Request body is JSON but not the expected shape.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// Path or query parameter failed to parse.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Write rejected by a schema constraint.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    EmptyBody,
    InvalidBody,
    InvalidParameter,
    Integrity,
    Internal,
}

impl ErrorKind {
    /// Stable identifier sent to clients.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::EmptyBody => "empty_body",
            Self::InvalidBody => "invalid_body",
            Self::InvalidParameter => "invalid_parameter",
            Self::Integrity => "integrity_violation",
            Self::Internal => "internal",
        }
    }

    /// HTTP status for this kind.
    ///
    /// Missing resources answer 400 like every other client error.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::NotFound
            | Self::EmptyBody
            | Self::InvalidBody
            | Self::InvalidParameter
            | Self::Integrity => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::EmptyBody => ErrorKind::EmptyBody,
            Self::InvalidBody(_) => ErrorKind::InvalidBody,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("record not found".to_owned()),
            RepositoryError::Integrity(msg) => Self::Integrity(msg),
            other => Self::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        if kind == ErrorKind::Internal {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, kind = kind.as_str(), "Request rejected");
        }

        // Don't expose error details to clients
        (kind.status(), Json(json!({ "error": kind.as_str() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        assert_eq!(AppError::EmptyBody.to_string(), "Request body is empty");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("cart 9".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::EmptyBody), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AppError::InvalidBody("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Integrity("fk".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_errors_keep_their_kind() {
        assert_eq!(
            AppError::from(RepositoryError::NotFound).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AppError::from(RepositoryError::Integrity("dup".to_string())).kind(),
            ErrorKind::Integrity
        );
        assert_eq!(
            AppError::from(RepositoryError::DataCorruption("bad".to_string())).kind(),
            ErrorKind::Internal
        );
    }
}
