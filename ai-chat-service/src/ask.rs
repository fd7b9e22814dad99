//! Tagged result type for completion calls and the client interface.

use std::fmt;

use async_trait::async_trait;

/// Outcome of a single completion call.
///
/// The client never panics and never returns a raw transport error to the
/// caller; every failure is folded into `Failure` with a classified kind
/// and a diagnostic message intended for logs, not for end users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskResult {
    Success { answer: String },
    Failure { error: String, kind: FailureKind },
}

/// Classification of a failed completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider answered with a structured error (rate limit, invalid
    /// request, rejected content).
    ApiError,
    /// The provider was unreachable or misconfigured (missing credential,
    /// transport failure).
    NetworkError,
    /// Empty or undecodable payload, or any other unexpected condition.
    GeneralError,
    /// Reserved for wrappers that fail outside the client proper.
    ServiceError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ApiError => "api_error",
            FailureKind::NetworkError => "network_error",
            FailureKind::GeneralError => "general_error",
            FailureKind::ServiceError => "service_error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interface for issuing one completion call.
///
/// The production implementation is
/// [`crate::services::open_ai_service::OpenAiService`]; handlers take the
/// trait so tests can substitute canned results.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `question` as the sole message of a non-streaming completion
    /// request. The caller is responsible for having length-checked the
    /// question already.
    async fn ask(&self, question: &str) -> AskResult;
}
