use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Error returned by handlers and extractors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by the domain layer
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// No `Authorization` header on a protected endpoint
    #[error("missing authorization header")]
    MissingToken,
    /// Malformed header or unknown token
    #[error("invalid token")]
    InvalidToken,
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        ApiError::Domain(DomainError::Database(err))
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Domain(DomainError::Validation(message)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            ApiError::Domain(DomainError::Authorization(message)) => {
                (StatusCode::BAD_REQUEST, "AUTHORIZATION_ERROR", message.clone())
            }
            ApiError::Domain(err @ DomainError::PermissionDenied) => {
                (StatusCode::FORBIDDEN, "PERMISSION_DENIED", err.to_string())
            }
            ApiError::Domain(err @ DomainError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            ApiError::Domain(DomainError::PasswordHash(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
            ApiError::Domain(DomainError::Database(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Internal server error".to_string(),
            ),
            ApiError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHENTICATED",
                "Authentication credentials were not provided.".to_string(),
            ),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid token.".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Domain(DomainError::Database(db_error)) => {
                error!("Database error while handling request: {}", db_error);
            }
            ApiError::Domain(DomainError::PasswordHash(hash_error)) => {
                error!("Password hashing failed while handling request: {}", hash_error);
            }
            _ => {}
        }

        let (status, code, message) = self.parts();
        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        });

        (status, body).into_response()
    }
}
