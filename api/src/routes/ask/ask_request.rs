use serde::{Deserialize, Serialize};

/// Request payload for /api/ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question. Optional at the serde level so a missing
    /// field produces a field-level validation message instead of a body
    /// rejection.
    #[serde(default)]
    pub question: Option<String>,
}

/// Success payload for /api/ask.
///
/// `id` is null whenever the answer was produced but not persisted; in
/// that case `warning` says why.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub success: bool,
    pub id: Option<String>,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
