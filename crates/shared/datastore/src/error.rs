//! Data-access error taxonomy.
//!
//! Every failure is classified into one of three kinds callers can act on:
//! permission denied, uniqueness violation, or a generic failure.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// PostgreSQL `unique_violation`.
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL `insufficient_privilege` (raised by row-level security).
pub const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Result type for data-access operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors surfaced by a [`DataStore`](crate::DataStore).
#[derive(Debug, Error)]
pub enum DataError {
    /// Base URL or access key missing.
    #[error("Data store is not configured: missing {0}")]
    Configuration(String),

    /// Credentials rejected for this operation (row-level policy).
    #[error("Permission denied on {table}: {message}")]
    PermissionDenied { table: String, message: String },

    /// Duplicate key on insert.
    #[error("Duplicate key on {table}: {message}")]
    UniqueViolation {
        table: String,
        message: String,
        details: Option<String>,
    },

    /// Any other non-success response.
    #[error("Query on {table} failed ({status}): {message}")]
    Query {
        table: String,
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Filter expression could not be parsed.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Response or record could not be (de)serialized.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Coarse classification of a [`DataError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataErrorKind {
    PermissionDenied,
    UniqueViolation,
    Generic,
}

impl std::fmt::Display for DataErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataErrorKind::PermissionDenied => write!(f, "permission-denied"),
            DataErrorKind::UniqueViolation => write!(f, "uniqueness-violation"),
            DataErrorKind::Generic => write!(f, "generic"),
        }
    }
}

impl DataError {
    pub fn kind(&self) -> DataErrorKind {
        match self {
            DataError::PermissionDenied { .. } => DataErrorKind::PermissionDenied,
            DataError::UniqueViolation { .. } => DataErrorKind::UniqueViolation,
            _ => DataErrorKind::Generic,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.kind() == DataErrorKind::PermissionDenied
    }

    pub fn is_unique_violation(&self) -> bool {
        self.kind() == DataErrorKind::UniqueViolation
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        DataError::Decode(msg.into())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Decode(err.to_string())
    }
}

/// PostgREST error body.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorResponse {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Classify a non-success response.
///
/// The Postgres error code wins over the HTTP status: a `23505` is a
/// uniqueness violation whatever status carried it.
pub fn classify(table: &str, status: StatusCode, body: &str) -> DataError {
    let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let snippet: String = body.chars().take(200).collect();
            if snippet.is_empty() {
                status.to_string()
            } else {
                snippet
            }
        });
    let table = table.to_string();

    match parsed.code.as_deref() {
        Some(PG_UNIQUE_VIOLATION) => DataError::UniqueViolation {
            table,
            message,
            details: parsed.details,
        },
        Some(PG_INSUFFICIENT_PRIVILEGE) => DataError::PermissionDenied { table, message },
        _ if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN => {
            DataError::PermissionDenied { table, message }
        }
        _ => DataError::Query {
            table,
            status: status.as_u16(),
            code: parsed.code,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_is_unique_violation() {
        let body = r#"{"code":"23505","details":"Key (phone_number)=(+49) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"phone_numbers_pkey\""}"#;

        let err = classify("phone_numbers", StatusCode::CONFLICT, body);

        assert_eq!(err.kind(), DataErrorKind::UniqueViolation);
        match err {
            DataError::UniqueViolation { details, .. } => {
                assert!(details.unwrap().contains("already exists"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_code_wins_over_status() {
        let body = r#"{"code":"23505","message":"duplicate key"}"#;
        let err = classify("t", StatusCode::BAD_REQUEST, body);
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_row_level_security_is_permission_denied() {
        let body = r#"{"code":"42501","message":"new row violates row-level security policy for table \"registrations\""}"#;

        let err = classify("registrations", StatusCode::UNAUTHORIZED, body);
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_forbidden_without_body_is_permission_denied() {
        let err = classify("registrations", StatusCode::FORBIDDEN, "");
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_other_failures_are_generic() {
        let body = r#"{"code":"42P01","message":"relation \"public.nope\" does not exist"}"#;

        let err = classify("nope", StatusCode::NOT_FOUND, body);

        assert_eq!(err.kind(), DataErrorKind::Generic);
        match err {
            DataError::Query { status, code, .. } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("42P01"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body_kept_as_message() {
        let err = classify("t", StatusCode::BAD_GATEWAY, "upstream timed out");
        assert!(err.to_string().contains("upstream timed out"));
        assert_eq!(err.kind(), DataErrorKind::Generic);
    }

    #[test]
    fn test_configuration_and_decode_are_generic() {
        assert_eq!(
            DataError::Configuration("SUPABASE_URL".into()).kind(),
            DataErrorKind::Generic
        );
        assert_eq!(DataError::decode("bad").kind(), DataErrorKind::Generic);
    }
}
