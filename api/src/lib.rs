//! HTTP layer: router, handlers, and the shared application state.
//!
//! The router is a separate constructor from the server loop so tests can
//! drive it in-process without binding a socket.

mod core;
mod error_handler;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::info;

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::{
    ask::ask_route::ask,
    history::history_route::{delete_history, history},
};

/// Builds the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ask", post(ask))
        .route("/api/history", get(history).delete(delete_history))
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves the API with graceful shutdown on Ctrl+C.
pub async fn serve(addr: &str, state: AppState) -> AppResult<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;

    info!(%addr, "chat backend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
