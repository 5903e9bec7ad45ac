//! Application error type shared by every layer.
//!
//! Errors fall into a small taxonomy, each mapped to an HTTP status:
//!
//! - [`AppError::Validation`] - Malformed input (400)
//! - [`AppError::NotFound`] - No entity at the given identifier (404)
//! - [`AppError::Persistence`] - The database rejected the operation (400 or 500)
//! - [`AppError::Internal`] - Anything else (500)

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serialized error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// `status` is 400 when the caller's write was rejected and 500 when the
    /// failure is treated as a server fault.
    #[error("{message}")]
    Persistence {
        status: StatusCode,
        message: String,
        details: Value,
    },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn persistence(status: StatusCode, message: impl Into<String>, details: Value) -> Self {
        Self::Persistence {
            status,
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Persistence { status, .. } => *status,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Persistence { .. } => "persistence_error",
            AppError::Internal { .. } => "internal_error",
        }
    }

    /// Re-labels a persistence failure with the operation it interrupted.
    ///
    /// Other kinds are returned unchanged so that a `NotFound` raised inside a
    /// write keeps its 404.
    pub fn into_persistence(self, status: StatusCode, context: &str) -> Self {
        match self {
            AppError::Persistence {
                message, details, ..
            }
            | AppError::Internal { message, details } => AppError::Persistence {
                status,
                message: format!("{context}: {message}"),
                details,
            },
            other => other,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::Persistence {
                message, details, ..
            }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        let details = match e.as_database_error() {
            Some(db) => json!({
                "cause": db.message(),
                "constraint": db.constraint(),
            }),
            None => json!({ "cause": e.to_string() }),
        };

        AppError::persistence(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), details)
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        AppError::internal("Migration failed", json!({ "cause": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid request payload", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid JSON body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(
            "Invalid path parameter",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(
            "Invalid query parameters",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
