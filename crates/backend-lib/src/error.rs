// crates/backend-lib/src/error.rs

//! Central error type for the authentication workflows + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use passgate_common::ErrorEnvelope;
use thiserror::Error;

use crate::auth::SessionError;
use crate::storage::RepositoryError;

/// Every way a registration, login or logout can fail.
///
/// Each variant is produced by exactly one gate of a workflow and returned
/// to the caller as soon as it is detected.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Method not supported: {0}")]
    MethodNotSupported(String),

    #[error("Column {field} does not exist")]
    Schema { field: String },

    #[error("Invalid request body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Missing or empty field: {field}")]
    MissingField { field: String },

    #[error("Account already exists")]
    DuplicateAccount,

    #[error("Account lookup failed: {0}")]
    Lookup(#[source] RepositoryError),

    #[error("Username not found: {0}")]
    NotFound(String),

    #[error("Unable to get value from column: {field}")]
    FieldProjection { field: String },

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Invalid password")]
    PasswordMismatch,

    #[error("Persisting account failed: {0}")]
    Persistence(#[source] RepositoryError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MethodNotSupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            AuthError::Decode(_) | AuthError::MissingField { .. } => StatusCode::BAD_REQUEST,
            AuthError::DuplicateAccount => StatusCode::CONFLICT,
            // Both map to 401 so login does not reveal which usernames exist
            AuthError::NotFound(_) | AuthError::PasswordMismatch => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MethodNotSupported(_) => "REQ_001",
            AuthError::Schema { .. } => "SCHEMA_001",
            AuthError::Decode(_) => "REQ_002",
            AuthError::MissingField { .. } => "REQ_003",
            AuthError::DuplicateAccount => "AUTH_004",
            AuthError::Lookup(_) => "STORE_001",
            AuthError::NotFound(_) => "AUTH_001",
            AuthError::FieldProjection { .. } => "STORE_002",
            AuthError::Hash(_) => "HASH_001",
            AuthError::PasswordMismatch => "AUTH_002",
            AuthError::Persistence(_) => "STORE_003",
            AuthError::Session(_) => "SESSION_001",
            AuthError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AuthError::MethodNotSupported(_) => "Method not supported".to_string(),
            AuthError::Decode(_) => "Invalid request format".to_string(),
            AuthError::MissingField { field } => format!("Field {field} is required"),
            AuthError::DuplicateAccount => "Account already exists".to_string(),
            AuthError::NotFound(_) | AuthError::PasswordMismatch => {
                "Authentication failed".to_string()
            },
            _ => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = ErrorEnvelope::new(self.error_code(), message);

        (status, axum::Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("background task failed: {err}"))
    }
}
