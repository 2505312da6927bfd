//! Centralized error handling.
//!
//! One error type covers the whole crate; the API layer converts it into
//! HTTP responses without leaking internal details.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::infra::repositories::QueryCompileError;
use crate::services::auth::{AuthenticationError, AuthorizationError, TokenError};
use crate::services::crud::MalformedData;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Identity & permissions
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Token(#[from] TokenError),

    /// Action not permitted because of the resource's current state.
    #[error("{0}")]
    UnauthorizedOperation(String),

    // Resource errors
    #[error("{resource} with key {key} not found")]
    NotFound { resource: &'static str, key: String },

    #[error("{0} already exists")]
    Conflict(String),

    // Input errors
    #[error(transparent)]
    Malformed(#[from] MalformedData),

    #[error("{0}")]
    Validation(ValidationErrors),

    // Query & store errors
    #[error(transparent)]
    QueryCompile(#[from] QueryCompileError),

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for the client
    fn code(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "AUTHENTICATION_FAILED",
            AppError::Authorization(_) => "FORBIDDEN",
            AppError::Token(TokenError::Unpacking(_)) => "AUTHENTICATION_FAILED",
            AppError::Token(TokenError::Generation(_)) => "TOKEN_GENERATION_FAILED",
            AppError::UnauthorizedOperation(_) => "UNAUTHORIZED_OPERATION",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Malformed(_) => "MALFORMED_DATA",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::QueryCompile(_) => "QUERY_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) | AppError::Token(TokenError::Unpacking(_)) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::UnauthorizedOperation(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Malformed(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Token(TokenError::Generation(_))
            | AppError::QueryCompile(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => format_validation_errors(errors),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::QueryCompile(e) => {
                tracing::error!("Query compile error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::Token(TokenError::Generation(e)) => {
                tracing::error!("Token generation error: {:?}", e);
                "Could not issue authentication token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Flatten validation errors into one readable line per violated field
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| format!("{}: {}", field, m))
                    .unwrap_or_else(|| format!("{}: invalid value", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience constructors
impl AppError {
    pub fn not_found(resource: &'static str, key: &impl std::fmt::Debug) -> Self {
        AppError::NotFound {
            resource,
            key: format!("{:?}", key),
        }
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}
