//! OpenAI-compatible chat-completion service.
//!
//! Minimal, non-streaming client around the chat REST API. The endpoint is
//! derived from `ChatModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions — chat completion (non-streaming)
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via unified error types in `error_handler`, and the
//! [`CompletionClient`] implementation folds them into a tagged
//! [`AskResult`] so callers never see a raw transport error.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    ask::{AskResult, CompletionClient},
    config::chat_model_config::ChatModelConfig,
    error_handler::{AiChatError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for an OpenAI-compatible chat-completion API.
///
/// Constructed from a complete [`ChatModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
/// One blocking round trip per [`CompletionClient::ask`] call: no retries,
/// no streaming, no caching.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: ChatModelConfig,
    url_chat: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// Validates the API key and endpoint scheme, then builds an HTTP
    /// client with default headers and a configurable timeout.
    ///
    /// # Errors
    /// - [`AiChatError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`AiChatError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiChatError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: ChatModelConfig) -> Result<Self, AiChatError> {
        // 1) API key must be present.
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::MissingApiKey))?;

        // 2) Endpoint must use http/https.
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(
                ProviderError::new(ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()))
                    .into(),
            );
        }

        // 3) HTTP client: timeout + default headers.
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                ProviderError::new(ProviderErrorKind::Decode(format!(
                    "invalid API key header: {e}"
                )))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/v1/chat/completions", base);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            max_tokens = cfg.max_tokens.unwrap_or(0),
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Performs a **non-streaming** chat completion request.
    ///
    /// The `messages` array carries exactly one user message; no
    /// conversation history is sent. Mapped options from config: `model`,
    /// `temperature`, `top_p`, `max_tokens`.
    ///
    /// # Errors
    /// - [`AiChatError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiChatError::HttpTransport`] for client/network failures
    /// - [`AiChatError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`AiChatError::Provider`] with `EmptyChoices` if no content is returned
    async fn generate(&self, question: &str) -> Result<String, AiChatError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, question);

        debug!(
            model = %self.cfg.model,
            endpoint = %self.cfg.endpoint,
            question_len = question.len(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(ProviderError::new(ProviderErrorKind::HttpStatus {
                status,
                url,
                snippet,
            })
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completion response"
                );
                return Err(ProviderError::new(ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                )))
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyChoices))?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );

        Ok(content)
    }
}

#[async_trait]
impl CompletionClient for OpenAiService {
    async fn ask(&self, question: &str) -> AskResult {
        match self.generate(question).await {
            Ok(answer) => AskResult::Success {
                answer: answer.trim().to_owned(),
            },
            Err(e) => AskResult::Failure {
                kind: e.classify(),
                error: e.to_string(),
            },
        }
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Builds a single-message chat request from config and the question.
    fn from_cfg(cfg: &'a ChatModelConfig, question: &'a str) -> Self {
        Self {
            model: &cfg.model,
            messages: vec![ChatMessage {
                role: "user",
                content: question,
            }],
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

/// Chat message for the completion API.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}
