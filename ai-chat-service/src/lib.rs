//! Chat-completion client.
//!
//! Wraps a single outbound call to a remote chat-completion provider and
//! normalizes every failure mode into the tagged [`ask::AskResult`] type,
//! so callers classify outcomes by matching instead of catching.

pub mod ask;
pub mod config;
pub mod error_handler;
pub mod services;

pub use ask::{AskResult, CompletionClient, FailureKind};
pub use config::chat_model_config::ChatModelConfig;
pub use error_handler::AiChatError;
pub use services::open_ai_service::OpenAiService;
