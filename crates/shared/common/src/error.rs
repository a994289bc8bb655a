//! Unified error handling for the console API.
//!
//! Provides a single error type that converts to an Axum HTTP response with
//! a stable error code and a message that never leaks internal details.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Operator identity & authorization
    #[error("Operator role required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0}")]
    SeatLimit(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Action lifecycle
    #[error("Action cancelled")]
    Cancelled,

    // External library errors
    #[cfg(feature = "jwt")]
    #[error("Session token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
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
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::SeatLimit(_) => "SEAT_LIMIT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Cancelled => "CANCELLED",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "SESSION_TOKEN_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::SeatLimit(_) | AppError::Cancelled => {
                StatusCode::CONFLICT
            }
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) | AppError::SeatLimit(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),

            // Hide details for internal errors
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::error!("Session token error: {:?}", e);
                "Could not issue session token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

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

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(_) => AppError::NotFound,
            DomainError::Conflict(entity) => AppError::Conflict(entity),
            DomainError::Forbidden => AppError::Forbidden,
            err @ DomainError::SeatsExhausted(_) => AppError::SeatLimit(err.to_string()),
            err @ DomainError::OverAllocated { .. } => AppError::Internal(err.to_string()),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Role;

    #[test]
    fn domain_errors_map_to_http_status() {
        let cases = [
            (DomainError::validation("bad"), StatusCode::BAD_REQUEST),
            (DomainError::not_found("Account"), StatusCode::NOT_FOUND),
            (DomainError::conflict("Email"), StatusCode::CONFLICT),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (DomainError::SeatsExhausted(Role::Agent), StatusCode::CONFLICT),
        ];
        for (domain_err, status) in cases {
            assert_eq!(AppError::from(domain_err).status(), status);
        }
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::internal("lock poisoned at store.rs:42");
        assert_eq!(err.user_message(), "An internal error occurred");
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn conflict_message_names_entity() {
        assert_eq!(AppError::conflict("Email").user_message(), "Email already exists");
        assert_eq!(
            AppError::from(DomainError::SeatsExhausted(Role::Agent)).user_message(),
            "No Agent seats available"
        );
    }
}
