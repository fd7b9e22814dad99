//! Default chat-model config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`    = API key (mandatory)
//! - `OPENAI_MODEL`      = model identifier (default `gpt-3.5-turbo`)
//! - `OPENAI_URL`        = API base URL (default `https://api.openai.com`)
//! - `CHAT_MAX_TOKENS`   = response-length cap (u32, default 150)
//! - `CHAT_TIMEOUT_SECS` = request timeout in seconds (u64, optional)

use crate::{
    config::chat_model_config::ChatModelConfig,
    error_handler::{AiChatError, env_opt_u32, env_opt_u64, must_env},
};

fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Constructs the OpenAI chat config from the environment.
///
/// # Errors
/// - [`AiChatError::Config`] if `OPENAI_API_KEY` is missing or a numeric
///   variable fails to parse.
pub fn config_openai_chat() -> Result<ChatModelConfig, AiChatError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = env_or("OPENAI_MODEL", "gpt-3.5-turbo");
    let endpoint = env_or("OPENAI_URL", "https://api.openai.com");
    let max_tokens = env_opt_u32("CHAT_MAX_TOKENS")?.or(Some(150));
    let timeout_secs = env_opt_u64("CHAT_TIMEOUT_SECS")?;

    Ok(ChatModelConfig {
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: None,
        top_p: None,
        timeout_secs,
    })
}
