//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//!
//! The operator-facing surface deliberately collapses all transport-class
//! failures into one retryable message; the distinct internal kind is kept
//! for logging and tests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use parceldeck_core::EngineError;

use crate::scanner::BackendError;

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// The lifecycle engine rejected its input or a mutation target.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// A scanner backend call failed.
    #[error("Scanner error: {0}")]
    Backend(#[from] BackendError),

    /// No authenticated session; the caller must log in first.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-class errors to Sentry. Validation failures are a
        // scanner contract violation, so they count.
        if matches!(
            self,
            Self::Backend(_) | Self::Internal(_) | Self::Engine(EngineError::Validation { .. })
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Engine(EngineError::Validation { .. }) | Self::Backend(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Engine(EngineError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients.
        let message = match &self {
            Self::Engine(EngineError::Validation { .. }) => {
                "Scanner returned malformed order data".to_string()
            }
            Self::Engine(EngineError::NotFound(order_number)) => {
                format!("Order {order_number} not found")
            }
            Self::Backend(_) => "Scanner service unavailable. Please try again.".to_string(),
            Self::Unauthenticated => "Please log in first".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::BadRequest(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the session email.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use parceldeck_core::OrderNumber;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid bucket".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid bucket");
    }

    #[test]
    fn test_validation_is_bad_gateway() {
        let err = AppError::Engine(EngineError::Validation {
            reason: "missing date".to_string(),
        });
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let Some(order_number) = OrderNumber::new("PKG-1") else {
            panic!("valid order number");
        };
        let err = AppError::Engine(EngineError::NotFound(order_number));
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthenticated_maps_to_401() {
        assert_eq!(get_status(AppError::Unauthenticated), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_backend_error_collapses_to_retryable_message() {
        let err = AppError::Backend(BackendError::Status { status: 500 });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
