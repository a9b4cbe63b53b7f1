//! Error types for the calendar sync service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while handling a reservation webhook.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Webhook source header did not match
    #[error("Unauthorized")]
    Unauthorized,

    /// Reservation payload was malformed or incomplete
    #[error("Validation error: {0}")]
    Validation(String),

    /// Service-account token exchange failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Signing the service-account assertion failed
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Transport-level failure talking to Google
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google Calendar rejected a request
    #[error("Calendar API error ({status}): {message}")]
    CalendarApi { status: u16, message: String },

    /// No calendar in the caller's list carries this display name
    #[error("No calendar named '{0}' in the calendar list")]
    CalendarNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// HTTP status code reported to the webhook caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyncError::Unauthorized => StatusCode::UNAUTHORIZED,
            SyncError::Validation(_) => StatusCode::BAD_REQUEST,
            SyncError::Auth(_)
            | SyncError::Http(_)
            | SyncError::CalendarApi { .. }
            | SyncError::CalendarNotFound(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let SyncError::Unauthorized = self {
            warn!("Rejected webhook with mismatched source header");
            return (status, "Unauthorized").into_response();
        }

        if status.is_server_error() {
            error!("Webhook failed: {}", self);
        } else {
            warn!("Webhook rejected: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
