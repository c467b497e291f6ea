//! Unified error handling for the platform service.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::vercel::VercelError;

/// Application-level error type for the platform API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Hosting-provider API operation failed.
    #[error("Provider error: {0}")]
    Provider(#[from] VercelError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks permission (wrong merchant, missing entitlement).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// User-facing validation failure (duplicate slug, bad field).
    #[error("{0}")]
    Validation(String),

    /// Conflicting state (duplicate name, invalid invoice transition).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Echo the provider's status when it gave one
            Self::Provider(e) => e
                .http_status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Platform request error"
            );
        } else if matches!(self, Self::Provider(_)) {
            tracing::warn!(error = %self, "Hosting-provider request error");
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Provider(e) => e.provider_message(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Repository outcomes carry their HTTP meaning: a missing row is a 404 and
/// a constraint conflict a 409, not server errors.
impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource".to_string()),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("store 123".to_string());
        assert_eq!(err.to_string(), "Not found: store 123");

        let err = AppError::Validation("a store with this name already exists".to_string());
        assert_eq!(err.to_string(), "a store with this name already exists");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_outcomes_keep_http_meaning() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err: AppError = RepositoryError::Conflict("duplicate".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let err: AppError = RepositoryError::DataCorruption("bad items".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_provider_error_echoes_status() {
        let err = AppError::Provider(VercelError::Api {
            status: 409,
            code: "domain_taken".to_string(),
            message: "Domain is already in use".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
