//! POST /api/ask — validate, complete, size-gate, persist.
//!
//! The flow has four steps with terminal responses at each: input
//! validation (422), completion failure (classified status), the size-gate
//! (200 without persistence), and persistence itself. A persistence
//! failure is never surfaced as an error: the caller always gets the
//! generated answer, degraded to `id: null` plus a warning.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use ai_chat_service::{AskResult, FailureKind};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{error_response, validation_error_response},
    },
    routes::ask::ask_request::{AskRequest, AskResponse},
};

const MIN_QUESTION_CHARS: usize = 3;
const MAX_QUESTION_CHARS: usize = 1000;
const MAX_ANSWER_CHARS: usize = 10_000;

const WARNING_TOO_LARGE: &str = "Content too large to save to history";
const WARNING_NOT_SAVED: &str = "Answer generated but not saved to history";

/// Handler: POST /api/ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"How can I save money?"}'
/// ```
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let question = match validate_question(payload) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    match state.completion.ask(&question).await {
        AskResult::Failure { error, kind } => {
            error!(
                question = %question,
                error = %error,
                kind = %kind,
                "completion client failed"
            );
            error_response(
                failure_status(kind),
                "AI Service Error",
                user_facing_message(kind),
            )
        }
        AskResult::Success { answer } => save_and_respond(&state, &question, answer).await,
    }
}

/// Validates the request body: question present, a string, length in
/// [3, 1000] characters. Returns the terminal 422 response on violation.
fn validate_question(payload: Result<Json<AskRequest>, JsonRejection>) -> Result<String, Response> {
    let Json(req) = payload.map_err(|_| {
        validation_error_response(json!({ "question": ["The question must be a string."] }))
    })?;

    let Some(question) = req.question else {
        return Err(validation_error_response(
            json!({ "question": ["The question field is required."] }),
        ));
    };

    let len = question.chars().count();
    if len < MIN_QUESTION_CHARS {
        return Err(validation_error_response(json!({
            "question": [format!("The question must be at least {MIN_QUESTION_CHARS} characters.")]
        })));
    }
    if len > MAX_QUESTION_CHARS {
        return Err(validation_error_response(json!({
            "question": [format!(
                "The question may not be greater than {MAX_QUESTION_CHARS} characters."
            )]
        })));
    }

    Ok(question)
}

/// Size-gate then persist. Both failure paths degrade to a 200 with the
/// answer and a warning.
async fn save_and_respond(state: &AppState, question: &str, answer: String) -> Response {
    // The question bound is checked again after completion; only the
    // answer bound is reachable here.
    let question_chars = question.chars().count();
    let answer_chars = answer.chars().count();
    if question_chars > MAX_QUESTION_CHARS || answer_chars > MAX_ANSWER_CHARS {
        warn!(
            question_length = question_chars,
            answer_length = answer_chars,
            "content too large to save"
        );
        return degraded(answer, WARNING_TOO_LARGE);
    }

    match state.store.create(question, &answer).await {
        Ok(interaction) => Json(AskResponse {
            success: true,
            id: Some(interaction.id.to_string()),
            answer,
            warning: None,
        })
        .into_response(),
        Err(e) => {
            if e.is_database() {
                error!(
                    question = %question,
                    answer_length = answer.len(),
                    error = %e,
                    "database persistence error"
                );
            } else {
                error!(
                    question = %question,
                    answer_length = answer.len(),
                    error = %e,
                    "interaction save error"
                );
            }
            degraded(answer, WARNING_NOT_SAVED)
        }
    }
}

fn degraded(answer: String, warning: &str) -> Response {
    Json(AskResponse {
        success: true,
        id: None,
        answer,
        warning: Some(warning.to_owned()),
    })
    .into_response()
}

fn failure_status(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::ApiError => StatusCode::UNPROCESSABLE_ENTITY,
        FailureKind::NetworkError | FailureKind::ServiceError => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Fixed user-facing strings; raw provider errors stay in the logs.
fn user_facing_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::ApiError => {
            "The AI service is temporarily unavailable. Please try again in a few moments."
        }
        FailureKind::NetworkError => {
            "Connection error. Please check your internet connection and try again."
        }
        FailureKind::GeneralError => "Unable to process your request. Please try again.",
        _ => "An unexpected error occurred. Please try again later.",
    }
}
