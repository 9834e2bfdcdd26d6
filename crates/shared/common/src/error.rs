//! Unified error handling for the HTTP surface.
//!
//! Provides a single error type that converts into Axum HTTP responses with a
//! `{ "error": { "code", "message" } }` body. Field-level validation failures
//! additionally carry a `fields` map.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, FieldErrors};
use serde::Serialize;
use thiserror::Error;

#[cfg(feature = "datastore")]
use datastore::{DataError, DataErrorKind};

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authorization
    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Validation failed: {0}")]
    InvalidFields(FieldErrors),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[cfg(feature = "datastore")]
    #[error("Data store error: {0}")]
    DataStore(#[from] DataError),

    #[error("Service unavailable")]
    ServiceUnavailable(String),

    // Internal
    #[error("Configuration error: {0}")]
    Configuration(String),

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
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "datastore")]
            AppError::DataStore(e) => match e.kind() {
                DataErrorKind::PermissionDenied => "PERMISSION_DENIED",
                DataErrorKind::UniqueViolation => "CONFLICT",
                DataErrorKind::Generic => "DATA_STORE_ERROR",
            },
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
            #[cfg(feature = "datastore")]
            AppError::DataStore(e) => match e.kind() {
                DataErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                DataErrorKind::UniqueViolation => StatusCode::CONFLICT,
                DataErrorKind::Generic => StatusCode::BAD_GATEWAY,
            },
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::InvalidFields(_) => "Please correct the highlighted fields".to_string(),

            // Hide details for internal/security errors
            #[cfg(feature = "datastore")]
            AppError::DataStore(e) => {
                tracing::error!(kind = ?e.kind(), "Data store error: {}", e);
                match e.kind() {
                    DataErrorKind::PermissionDenied => {
                        "The data store rejected this operation".to_string()
                    }
                    DataErrorKind::UniqueViolation => {
                        "A registration with these details already exists".to_string()
                    }
                    DataErrorKind::Generic => "A data store error occurred".to_string(),
                }
            }
            AppError::ServiceUnavailable(service) => {
                tracing::error!("Service unavailable: {}", service);
                format!("Service {} is unavailable", service)
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                "The service is not configured correctly".to_string()
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
        let message = self.user_message();
        let code = self.code().to_string();
        let fields = match self {
            AppError::InvalidFields(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                fields,
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
            DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::InvalidFields(errors)
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

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn service_unavailable(service: impl Into<String>) -> Self {
        AppError::ServiceUnavailable(service.into())
    }
}
