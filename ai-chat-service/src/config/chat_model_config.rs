/// Configuration for the chat-completion model invocation.
///
/// # Fields
///
/// - `model`: Model identifier (e.g., `"gpt-3.5-turbo"`).
/// - `endpoint`: API base URL; `/v1/chat/completions` is appended.
/// - `api_key`: Bearer token for the provider.
/// - `max_tokens`: Fixed response-length cap sent with every request.
/// - `temperature` / `top_p`: Optional sampling parameters.
/// - `timeout_secs`: Optional request timeout in seconds (default 60).
#[derive(Debug, Clone)]
pub struct ChatModelConfig {
    /// Model identifier string.
    pub model: String,

    /// API base URL (scheme required).
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
