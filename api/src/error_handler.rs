use thiserror::Error;

/// Startup/runtime errors for the HTTP layer.
///
/// Request-level failures never go through this type; handlers build their
/// response bodies directly so the wire shapes stay fixed.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),
}

/// Handy result alias used across the crate.
pub type AppResult<T> = Result<T, AppError>;
