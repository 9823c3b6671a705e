use crate::config_client::WeightProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
///
/// Client-facing variants carry the message returned in the `{"error": ...}`
/// body; upstream variants carry detail that is only logged.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Malformed body or empty lead list.
    BadRequest(String),
    /// Missing credentials or credentials rejected by the config service.
    Unauthorized(String),
    /// Route exists but not for this HTTP method.
    MethodNotAllowed,
    /// Request body exceeded the configured limit.
    PayloadTooLarge,
    /// Per-client rate limit exhausted.
    TooManyRequests,
    /// The config service failed for a reason other than authentication.
    ConfigUnavailable(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::PayloadTooLarge => write!(f, "Payload too large"),
            AppError::TooManyRequests => write!(f, "Too many requests"),
            AppError::ConfigUnavailable(msg) => write!(f, "Config service error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Status code and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large".to_string(),
            ),
            AppError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests".to_string(),
            ),
            AppError::ConfigUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch scoring config".to_string(),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            AppError::WithContext { source, .. } => source.status_and_message(),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Upstream and internal failures are logged with full detail and
    /// answered with a generic message.
    fn into_response(self) -> Response {
        match &self {
            AppError::ConfigUnavailable(msg) => {
                tracing::error!("Failed to fetch config: {}", msg);
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
            }
            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized access: {}", msg);
            }
            AppError::WithContext { .. } => {
                tracing::error!("Error with context: {}", self);
            }
            AppError::BadRequest(_)
            | AppError::MethodNotAllowed
            | AppError::PayloadTooLarge
            | AppError::TooManyRequests => {}
        }

        let (status, error_message) = self.status_and_message();
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<WeightProviderError> for AppError {
    fn from(err: WeightProviderError) -> Self {
        match err {
            WeightProviderError::Unauthorized => {
                AppError::Unauthorized("Invalid API key".to_string())
            }
            WeightProviderError::Unavailable(detail) => AppError::ConfigUnavailable(detail),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", err))
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }
}

impl<T> ResultExt<T> for Result<T, WeightProviderError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::from(e)),
            context: context.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_map_to_status() {
        let (status, message) = AppError::from(WeightProviderError::Unauthorized).status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid API key");

        let (status, message) =
            AppError::from(WeightProviderError::Unavailable("timeout".to_string()))
                .status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Failed to fetch scoring config");
    }

    #[test]
    fn test_limit_errors_map_to_status() {
        assert_eq!(
            AppError::PayloadTooLarge.status_and_message(),
            (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
        );
        assert_eq!(
            AppError::TooManyRequests.status_and_message(),
            (StatusCode::TOO_MANY_REQUESTS, "Too many requests".to_string())
        );
    }

    #[test]
    fn test_context_keeps_source_status() {
        let result: Result<(), WeightProviderError> = Err(WeightProviderError::Unauthorized);
        let err = result.context("Loading weights for acme").unwrap_err();

        assert_eq!(err.status_and_message().0, StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.to_string(),
            "Loading weights for acme: Unauthorized: Invalid API key"
        );
    }
}
