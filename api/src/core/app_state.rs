use std::sync::Arc;

use ai_chat_service::CompletionClient;
use interaction_store::InteractionStore;

/// Shared state for all HTTP handlers.
///
/// Both collaborators are injected as trait objects: the handlers never
/// construct a client or a store themselves, so tests can substitute
/// canned completions and failing repositories.
#[derive(Clone)]
pub struct AppState {
    /// Client for the remote chat-completion provider.
    pub completion: Arc<dyn CompletionClient>,
    /// Repository for persisted interactions.
    pub store: Arc<dyn InteractionStore>,
}

impl AppState {
    pub fn new(completion: Arc<dyn CompletionClient>, store: Arc<dyn InteractionStore>) -> Self {
        Self { completion, store }
    }
}
