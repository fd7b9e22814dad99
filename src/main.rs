use std::error::Error;
use std::sync::Arc;

use ai_chat_service::{OpenAiService, config::default_config::config_openai_chat};
use api::{AppError, AppState};
use interaction_store::{SqliteInteractionStore, seed};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let addr = std::env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;

    let completion = OpenAiService::new(config_openai_chat()?)?;

    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://chat_history.db".into());
    let store = SqliteInteractionStore::connect(&db_url).await?;

    if seed_requested() && store.count().await? == 0 {
        seed::seed_examples(&store).await?;
    }

    let state = AppState::new(Arc::new(completion), Arc::new(store));
    api::serve(&addr, state).await?;

    Ok(())
}

fn seed_requested() -> bool {
    matches!(
        std::env::var("SEED_EXAMPLE_DATA").ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
