//! Example data for local development.

use tracing::info;

use crate::{InteractionStore, Result};

const EXAMPLES: [(&str, &str); 4] = [
    (
        "What is financial wellness?",
        "Financial wellness means having control over your finances and being prepared for emergencies.",
    ),
    (
        "How can I save money?",
        "Track your expenses, set a budget, and save a portion of your income regularly.",
    ),
    (
        "Give me a tip for productivity.",
        "Set clear goals, prioritize tasks, and take regular breaks to stay focused.",
    ),
    (
        "What is the best way to learn programming?",
        "Practice regularly, build small projects, and read documentation and tutorials.",
    ),
];

/// Inserts the fixed example interactions. Returns how many were inserted.
///
/// Callers are expected to gate seeding on an empty store; this function
/// itself always inserts.
pub async fn seed_examples(store: &dyn InteractionStore) -> Result<usize> {
    for (question, answer) in EXAMPLES {
        store.create(question, answer).await?;
    }
    info!(count = EXAMPLES.len(), "example interactions seeded");
    Ok(EXAMPLES.len())
}
