//! HTTP error responses.
//!
//! Every failure leaves the server as `{"code": "...", "message": "..."}`
//! with a status derived from the error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use rental_core::CoreError;

use crate::service::ServiceError;

/// Machine-readable error codes sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    Duplicate,
    AlreadyRented,
    NotRented,
    ValidationError,
    BadRequest,
    DatabaseError,
}

/// Error returned from handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
    /// Internal detail, logged but never sent to the client.
    source: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause for the server log.
    pub fn with_source(mut self, source: impl fmt::Display) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// A request body that could not be decoded.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let (status, code) = match &err {
            CoreError::CarNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            CoreError::DuplicateRegistration(_) => (StatusCode::BAD_REQUEST, ErrorCode::Duplicate),
            CoreError::AlreadyRented(_) => (StatusCode::BAD_REQUEST, ErrorCode::AlreadyRented),
            CoreError::NotRented(_) => (StatusCode::BAD_REQUEST, ErrorCode::NotRented),
            CoreError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
        };
        ApiError::new(status, code, err.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Storage(e) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Database error",
            )
            .with_source(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: ErrorCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = ?self.code,
                message = %self.message,
                error = self.source.as_deref().unwrap_or("none"),
                "Internal server error"
            );
        }

        let body = ErrorBody {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
