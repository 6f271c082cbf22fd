//! Error types for the AttendMe reference server.
//!
//! - [`StoreError`] - refusals from the in-memory store
//! - [`ServerError`] - everything a request handler can fail with
//!
//! Every [`ServerError`] renders as the `{success: false, error}` envelope
//! the frontend expects, with a matching HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::api::types::error_response;

// =============================================================================
// Store Errors
// =============================================================================

/// Refusals from the roster and target store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A required person field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Person with ID {0} already exists")]
    DuplicatePerson(String),

    #[error("Person with ID {0} not found")]
    PersonNotFound(String),

    /// The person already holds the configured maximum.
    #[error("Maximum of {0} images reached for this person")]
    MaxImagesReached(usize),

    #[error("No files selected")]
    EmptySelection,
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Malformed request (bad multipart, bad JSON, missing part).
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Binding or serving failed.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Store(StoreError::DuplicatePerson(_)) => StatusCode::CONFLICT,
            ServerError::Store(StoreError::PersonNotFound(_)) | ServerError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ServerError::Store(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{} {}", status.as_u16(), self);
        }
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
