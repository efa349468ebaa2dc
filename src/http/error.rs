//! HTTP error responses.
//!
//! Every failure a handler can hit is converted into an [`ApiError`] at the
//! point where it happens. Clients only ever see the short message; the
//! underlying cause is logged before conversion.

use crate::models::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error as ThisError;

/// An error that is returned to the client as a plaintext response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ApiError {
    /// Malformed body, invalid id or failed validation (400).
    #[error("{0}")]
    BadRequest(&'static str),

    /// The addressed suggestion does not exist (404).
    #[error("{0}")]
    NotFound(&'static str),

    /// The path exists but does not accept the method (405).
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Storage or encoding failure (500).
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Logs a storage failure and converts it into a generic 500.
    pub fn internal(cause: &crate::Error, message: &'static str) -> Self {
        tracing::error!(error = %cause, response = message, "request failed");
        Self::Internal(message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::SuggestionRequired => Self::BadRequest("suggestion required"),
            ValidationError::NoFieldsToUpdate => Self::BadRequest("no fields to update"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), format!("{self}\n")).into_response()
    }
}
