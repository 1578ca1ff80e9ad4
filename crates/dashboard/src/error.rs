//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. JSON handlers return `Result<T, AppError>`; HTML
//! handlers render their own error pages and only use it for logging context.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_core::FieldErrors;
use serde::Serialize;
use thiserror::Error;

use crate::placeholder::PlaceholderError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote user source failed.
    #[error("Remote source error: {0}")]
    Remote(#[from] PlaceholderError),

    /// The store has no successful load to answer from yet.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Submitted fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
}

/// JSON body for validation failures.
#[derive(Debug, Serialize)]
struct ValidationBody<'a> {
    errors: &'a FieldErrors,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Remote(PlaceholderError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Remote(_) => StatusCode::BAD_GATEWAY,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture remote failures to Sentry; 503 only means "not loaded yet"
        if matches!(self, Self::Remote(_)) && status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        if let Self::Validation(errors) = &self {
            return (status, Json(ValidationBody { errors })).into_response();
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Remote(PlaceholderError::NotFound(id)) => format!("Not found: user {id}"),
            Self::Remote(_) => "External service error".to_string(),
            Self::Unavailable(message) => message.clone(),
            Self::Validation(errors) => errors.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}
