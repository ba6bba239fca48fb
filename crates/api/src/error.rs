use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use matcha_core::completion::CompletionError;
use matcha_core::error::CoreError;
use serde_json::json;

/// Message returned for any completion failure that is not the caller's fault.
pub const COMPLETION_FAILED: &str = "An error occurred while completing the profile";

const INTERNAL: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`CompletionError`] for domain errors and adds
/// HTTP-specific variants. Every failure body has the shape
/// `{ "success": false, "message": ..., "code": ... }`, except invalid
/// interests, which list the offending tags instead of a message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `matcha_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A profile-completion failure.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }

            // --- Completion pipeline ---
            AppError::Completion(err) => match err {
                CompletionError::InvalidInterests(invalid) => {
                    let body = json!({
                        "success": false,
                        "error": "Invalid interests",
                        "invalidInterests": invalid,
                        "code": "INVALID_INTERESTS",
                    });
                    return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
                }
                CompletionError::MissingFields(_) => {
                    (StatusCode::BAD_REQUEST, "MISSING_FIELDS", err.to_string())
                }
                CompletionError::InvalidPreference(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_PREFERENCE", err.to_string())
                }
                CompletionError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CompletionError::Upload(_)
                | CompletionError::UserNotFound(_)
                | CompletionError::Persistence(_) => {
                    tracing::error!(error = %err, "Profile completion failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "COMPLETION_FAILED",
                        COMPLETION_FAILED.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL.to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "message": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL.to_string(),
            )
        }
    }
}
