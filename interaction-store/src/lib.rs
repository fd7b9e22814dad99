//! SQLite-backed persistence for question/answer interactions.
//!
//! One table, three operations: create, ordered/filtered listing, bulk
//! delete. Records are immutable after creation; there is no update path.
//! Everything is exposed behind the [`InteractionStore`] trait so the HTTP
//! layer can be exercised against test doubles.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;
use uuid::Uuid;

pub mod errors;
pub mod seed;

pub use errors::{Result, StoreError};

/// A persisted question/answer pair.
///
/// The identifier and timestamp are assigned on creation and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Repository interface for interactions.
///
/// Implementations must not panic on store failures; every operation
/// returns a [`StoreError`] instead.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Persists a new interaction and returns it with its assigned id and
    /// timestamp.
    async fn create(&self, question: &str, answer: &str) -> Result<Interaction>;

    /// Returns at most `limit` interactions, newest first. When `keyword`
    /// is present, only records whose question OR answer contains it as a
    /// case-sensitive substring are returned.
    async fn find_recent(&self, limit: i64, keyword: Option<&str>) -> Result<Vec<Interaction>>;

    /// Removes every interaction. Returns the number of rows deleted;
    /// deleting from an empty table succeeds with 0.
    async fn delete_all(&self) -> Result<u64>;
}

/// Raw row as stored in SQLite. All columns are TEXT; the timestamp is
/// RFC3339 UTC with fixed microsecond precision so lexicographic order
/// matches chronological order.
#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    id: String,
    question: String,
    answer: String,
    created_at: String,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = StoreError;

    fn try_from(row: InteractionRow) -> Result<Interaction> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| StoreError::Corrupt(format!("invalid id {:?}: {e}", row.id)))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| {
                StoreError::Corrupt(format!("invalid created_at {:?}: {e}", row.created_at))
            })?
            .with_timezone(&Utc);
        Ok(Interaction {
            id,
            question: row.question,
            answer: row.answer,
            created_at,
        })
    }
}

/// SQLite implementation of [`InteractionStore`] over a `sqlx` pool.
#[derive(Debug, Clone)]
pub struct SqliteInteractionStore {
    pool: SqlitePool,
}

impl SqliteInteractionStore {
    /// Wraps an existing pool. Call [`SqliteInteractionStore::migrate`]
    /// before first use.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (and creates, if missing) the database at `url` and returns a
    /// migrated store.
    ///
    /// # Errors
    /// Returns [`StoreError::Database`] if the URL is invalid, the pool
    /// cannot connect, or the migration fails.
    pub async fn connect(url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Creates the `interactions` table if it does not exist. Idempotent.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS interactions (
                id TEXT PRIMARY KEY,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Number of stored interactions. Used by the seeding path to avoid
    /// duplicating example data on restart.
    pub async fn count(&self) -> Result<i64> {
        let n: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM interactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.0)
    }
}

#[async_trait]
impl InteractionStore for SqliteInteractionStore {
    async fn create(&self, question: &str, answer: &str) -> Result<Interaction> {
        let interaction = Interaction {
            id: Uuid::new_v4(),
            question: question.to_owned(),
            answer: answer.to_owned(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO interactions (id, question, answer, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(interaction.id.to_string())
        .bind(&interaction.question)
        .bind(&interaction.answer)
        .bind(
            interaction
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        )
        .execute(&self.pool)
        .await?;

        debug!(id = %interaction.id, "interaction persisted");
        Ok(interaction)
    }

    async fn find_recent(&self, limit: i64, keyword: Option<&str>) -> Result<Vec<Interaction>> {
        // `instr` rather than LIKE: SQLite LIKE is case-insensitive for
        // ASCII, while the keyword filter is a case-sensitive substring
        // match. The rowid tie-breaker keeps ordering stable for rows
        // created within the same microsecond.
        let rows: Vec<InteractionRow> = match keyword {
            Some(kw) => {
                sqlx::query_as(
                    "SELECT id, question, answer, created_at FROM interactions
                     WHERE instr(question, ?) > 0 OR instr(answer, ?) > 0
                     ORDER BY created_at DESC, rowid DESC
                     LIMIT ?",
                )
                .bind(kw)
                .bind(kw)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, question, answer, created_at FROM interactions
                     ORDER BY created_at DESC, rowid DESC
                     LIMIT ?",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Interaction::try_from).collect()
    }

    async fn delete_all(&self) -> Result<u64> {
        let res = sqlx::query("DELETE FROM interactions")
            .execute(&self.pool)
            .await?;
        debug!(rows = res.rows_affected(), "interaction history cleared");
        Ok(res.rows_affected())
    }
}
