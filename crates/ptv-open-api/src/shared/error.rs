//! Open API Error Types
//!
//! Two body shapes leave this module and clients branch on them:
//! `{"ErrorMessage": "..."}` for everything except field validation, which
//! is rendered as the accumulated `{"field": ["message"]}` map.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Message returned for failures of the domain collaborator.
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing the request.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrors),

    /// Malformed identifier that aborts the request instead of accumulating.
    #[error("{0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    VersionNotSupported(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Domain service failure: {0}")]
    Domain(#[from] DomainError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(field, message))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::VersionNotSupported(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Domain(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures surfaced by the domain-service collaborator.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;

pub type Result<T> = std::result::Result<T, ApiError>;

/// `{ "ErrorMessage": "..." }` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "ErrorMessage")]
    pub error_message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error_message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            ApiError::Validation(errors) => {
                tracing::debug!(fields = errors.len(), "Request rejected by validation");
                (status, Json(errors)).into_response()
            }
            ApiError::Domain(err) => {
                tracing::error!(error = %err, "Domain service failure");
                (status, Json(ErrorMessage::new(INTERNAL_ERROR_MESSAGE))).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal error");
                (status, Json(ErrorMessage::new(INTERNAL_ERROR_MESSAGE))).into_response()
            }
            ApiError::InvalidIdentifier(message)
            | ApiError::NotFound(message)
            | ApiError::VersionNotSupported(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message) => {
                (status, Json(ErrorMessage::new(message))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::validation("page", "bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidIdentifier("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::VersionNotSupported("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(DomainError::Unavailable("db".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_message_serialization() {
        let json = serde_json::to_string(&ErrorMessage::new("Organization with id 'x' not found.")).unwrap();
        assert_eq!(json, r#"{"ErrorMessage":"Organization with id 'x' not found."}"#);
    }
}
