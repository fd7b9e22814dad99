use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Flat error body shared by the ask and history flows.
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error response with a user-facing message.
pub fn error_response(
    status: StatusCode,
    error: &'static str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            error,
            message: Some(message.into()),
        }),
    )
        .into_response()
}

/// Error response carrying only an error label.
pub fn bare_error_response(status: StatusCode, error: &'static str) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            error,
            message: None,
        }),
    )
        .into_response()
}

/// 422 with field-level validation detail.
#[derive(Serialize)]
pub struct ValidationErrorBody {
    pub success: bool,
    pub error: &'static str,
    /// Per-field message lists, e.g. `{"question": ["..."]}`.
    pub messages: Value,
}

pub fn validation_error_response(messages: Value) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationErrorBody {
            success: false,
            error: "Invalid request",
            messages,
        }),
    )
        .into_response()
}
