use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message shown when a remote failure carries no text of its own.
pub const GENERIC_ANALYSIS_FAILURE: &str = "An error occurred while analyzing the call";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    ConfigurationMissing(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    RemoteCall(String),

    #[error("The analysis service returned no result")]
    EmptyResult,

    #[error("An analysis is already running")]
    Busy,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sign-in required")]
    Unauthorized,

    #[error("Spreadsheet error: {0}")]
    Sheets(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Builds a remote-call error from any displayable failure, falling back to a
    /// generic message when the failure renders as blank.
    pub fn remote(err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            AppError::RemoteCall(GENERIC_ANALYSIS_FAILURE.to_string())
        } else {
            AppError::RemoteCall(message)
        }
    }

    /// The text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

/// Malformed or mistyped JSON bodies are client input errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::ConfigurationMissing(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_MISSING")
            }
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::RemoteCall(msg) => {
                tracing::error!("Remote analysis error: {msg}");
                (StatusCode::BAD_GATEWAY, "REMOTE_CALL_FAILED")
            }
            AppError::EmptyResult => (StatusCode::BAD_GATEWAY, "EMPTY_RESULT"),
            AppError::Busy => (StatusCode::CONFLICT, "ANALYSIS_IN_PROGRESS"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Sheets(msg) => {
                tracing::error!("Sheets error: {msg}");
                (StatusCode::BAD_GATEWAY, "SHEETS_ERROR")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_uses_error_text() {
        let err = AppError::remote("quota exceeded");
        assert_eq!(err.user_message(), "quota exceeded");
    }

    #[test]
    fn test_remote_blank_falls_back_to_generic() {
        let err = AppError::remote("  ");
        assert_eq!(err.user_message(), GENERIC_ANALYSIS_FAILURE);
    }

    #[test]
    fn test_empty_result_message() {
        assert_eq!(
            AppError::EmptyResult.user_message(),
            "The analysis service returned no result"
        );
    }

    #[test]
    fn test_internal_hides_details() {
        let err = AppError::Internal(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.user_message(), "An internal server error occurred");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Busy.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::EmptyResult.into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ConfigurationMissing("x".into())
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
