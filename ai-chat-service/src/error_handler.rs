//! Unified error handling for `ai-chat-service`.
//!
//! A single top-level [`AiChatError`] wraps domain-specific enums for
//! configuration and provider failures, plus the raw HTTP transport error.
//! [`AiChatError::classify`] maps any error onto the coarse
//! [`FailureKind`] taxonomy surfaced to callers.

use reqwest::StatusCode;
use thiserror::Error;

use crate::ask::FailureKind;

/// Unified result alias for the crate.
pub type Result<T> = std::result::Result<T, AiChatError>;

/// Top-level error for the `ai-chat-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiChatError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider-side failures during a completion call.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (connect, timeout, TLS, DNS).
    #[error("transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

impl AiChatError {
    /// Maps the error onto the coarse failure taxonomy:
    /// misconfiguration and transport problems are network errors,
    /// structured provider responses are API errors, and everything that
    /// points at an unusable payload is a general error.
    pub fn classify(&self) -> FailureKind {
        match self {
            AiChatError::Config(_) | AiChatError::HttpTransport(_) => FailureKind::NetworkError,
            AiChatError::Provider(p) => match p.kind {
                ProviderErrorKind::MissingApiKey | ProviderErrorKind::InvalidEndpoint(_) => {
                    FailureKind::NetworkError
                }
                ProviderErrorKind::HttpStatus { .. } => FailureKind::ApiError,
                ProviderErrorKind::Decode(_) | ProviderErrorKind::EmptyChoices => {
                    FailureKind::GeneralError
                }
            },
        }
    }
}

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (limits, timeouts).
    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },
}

/// A failure reported by (or attributed to) the completion provider.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind) -> Self {
        Self { kind }
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// No API key configured.
    #[error("missing API key")]
    MissingApiKey,

    /// The endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// The provider returned no usable message content.
    #[error("empty choices in completion response")]
    EmptyChoices,
}

/// Trims a response body down to a short, single-line log snippet.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 300;
    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() <= MAX {
        collapsed
    } else {
        let mut cut = MAX;
        while !collapsed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &collapsed[..cut])
    }
}

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u32>().map(Some).map_err(|_| {
            AiChatError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            AiChatError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_classify_as_network() {
        let err = AiChatError::from(ConfigError::MissingVar("OPENAI_API_KEY"));
        assert_eq!(err.classify(), FailureKind::NetworkError);
    }

    #[test]
    fn provider_status_classifies_as_api() {
        let err = AiChatError::from(ProviderError::new(ProviderErrorKind::HttpStatus {
            status: StatusCode::TOO_MANY_REQUESTS,
            url: "https://api.openai.com/v1/chat/completions".into(),
            snippet: "rate limited".into(),
        }));
        assert_eq!(err.classify(), FailureKind::ApiError);
    }

    #[test]
    fn empty_and_undecodable_payloads_classify_as_general() {
        let empty = AiChatError::from(ProviderError::new(ProviderErrorKind::EmptyChoices));
        assert_eq!(empty.classify(), FailureKind::GeneralError);

        let decode =
            AiChatError::from(ProviderError::new(ProviderErrorKind::Decode("bad json".into())));
        assert_eq!(decode.classify(), FailureKind::GeneralError);
    }

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let s = make_snippet("line one\nline   two");
        assert_eq!(s, "line one line two");

        let long = "x".repeat(1000);
        assert!(make_snippet(&long).chars().count() <= 301);
    }
}
