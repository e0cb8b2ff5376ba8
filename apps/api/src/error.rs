//! Error handling for the Pulse HTTP surface
//!
//! GraphQL resolvers report failures as field errors inside a normal
//! response. This module covers the plain HTTP routes around them: the
//! readiness probe and disabled routes, with HTTP status code mapping via
//! Axum's IntoResponse trait.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repositories::StoreError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// A dependency the request needs did not answer
    #[error("{dependency} unavailable: {source}")]
    Unavailable {
        dependency: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unavailable { .. } => "SERVICE_UNAVAILABLE",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Create an error for a store that failed to answer
    pub fn store_unavailable(source: StoreError) -> Self {
        Self::Unavailable {
            dependency: "store",
            source,
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }

    /// Message safe to return to clients
    ///
    /// The underlying store error only goes to the log.
    fn public_message(&self) -> String {
        match self {
            Self::Unavailable { dependency, .. } => format!("{dependency} unreachable"),
            Self::NotFound { .. } => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.public_message(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
