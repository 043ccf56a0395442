//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use crate::messages;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recruitment_core::ports::PortError;
use serde_json::json;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any network call was made.
    #[error("{0}")]
    Validation(String),

    /// No candidate row matched the login.
    #[error("{0}")]
    NotFound(String),

    /// The request needs a candidate session.
    #[error("{0}")]
    Unauthorized(String),

    /// The candidate has already completed data entry.
    #[error("{0}")]
    Conflict(String),

    /// Uploads are blocked until an administrator finishes the setup.
    #[error("{0}")]
    NotConfigured(String),

    /// A remote call failed; the message is what the candidate sees.
    #[error("{0}")]
    Upstream(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Port(_) | ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The text returned to the client. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Port(_) => messages::NETWORK_ERROR.to_string(),
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                messages::SAVE_FAILED.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}
