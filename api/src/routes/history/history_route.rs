//! GET /api/history — recent interactions, newest first.
//! DELETE /api/history — unconditional bulk delete.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{bare_error_response, error_response},
    },
    routes::history::history_request::{
        DeleteHistoryResponse, HistoryMeta, HistoryQuery, HistoryResponse,
    },
};

const DEFAULT_LIMIT: i64 = 10;
const LIMIT_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

/// Handler: GET /api/history?limit=<int>&keyword=<string?>
///
/// Validates the limit before touching the store; a store failure maps to
/// 503 (database) or 500 (anything else) with no partial results.
pub async fn history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Response {
    // A non-numeric limit fails query deserialization; treat it the same
    // as an out-of-range one.
    let Ok(Query(params)) = query else {
        return invalid_limit();
    };

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if !LIMIT_RANGE.contains(&limit) {
        return invalid_limit();
    }

    // An empty keyword means no filter, matching the original behavior of
    // the query parameter being absent.
    let keyword = params.keyword.as_deref().filter(|k| !k.is_empty());

    match state.store.find_recent(limit, keyword).await {
        Ok(interactions) => {
            let meta = HistoryMeta {
                count: interactions.len(),
                limit,
                keyword: keyword.map(str::to_owned),
            };
            Json(HistoryResponse {
                success: true,
                data: interactions.into_iter().map(Into::into).collect(),
                meta,
            })
            .into_response()
        }
        Err(e) if e.is_database() => {
            error!(limit, error = %e, "database query error in history");
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Database error",
                "Unable to retrieve chat history due to database issue",
            )
        }
        Err(e) => {
            error!(limit, error = %e, "history retrieval error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error",
                "Unable to retrieve chat history",
            )
        }
    }
}

fn invalid_limit() -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid limit",
        "Limit must be between 1 and 100",
    )
}

/// Handler: DELETE /api/history
///
/// Removes all interactions. Deleting an already-empty history succeeds.
pub async fn delete_history(State(state): State<Arc<AppState>>) -> Response {
    match state.store.delete_all().await {
        Ok(_) => Json(DeleteHistoryResponse {
            success: true,
            message: "History deleted successfully.",
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "delete history error");
            bare_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unable to delete history.",
            )
        }
    }
}
