use serde::{Deserialize, Serialize};

use interaction_store::Interaction;

/// Query parameters for GET /api/history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of records to return. Defaults to 10; must be in
    /// [1, 100].
    #[serde(default)]
    pub limit: Option<i64>,
    /// Optional case-sensitive substring filter over question and answer.
    #[serde(default)]
    pub keyword: Option<String>,
}

/// One history record as returned on the wire.
#[derive(Debug, Serialize)]
pub struct InteractionItem {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub created_at: String,
}

impl From<Interaction> for InteractionItem {
    fn from(i: Interaction) -> Self {
        Self {
            id: i.id.to_string(),
            question: i.question,
            answer: i.answer,
            created_at: i.created_at.to_rfc3339(),
        }
    }
}

/// Success payload for GET /api/history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: Vec<InteractionItem>,
    pub meta: HistoryMeta,
}

/// Echo of the applied query parameters plus the returned count.
#[derive(Debug, Serialize)]
pub struct HistoryMeta {
    pub count: usize,
    pub limit: i64,
    /// Null when no keyword was applied.
    pub keyword: Option<String>,
}

/// Success payload for DELETE /api/history.
#[derive(Debug, Serialize)]
pub struct DeleteHistoryResponse {
    pub success: bool,
    pub message: &'static str,
}
