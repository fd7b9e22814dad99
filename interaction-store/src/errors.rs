use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or connectivity failure reported by the database driver.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back to the domain type.
    #[error("corrupt interaction row: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// True when the failure came from the database layer itself (query,
    /// pool, connectivity) rather than from row mapping.
    pub fn is_database(&self) -> bool {
        matches!(self, StoreError::Database(_))
    }
}
