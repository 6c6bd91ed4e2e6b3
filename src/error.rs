use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("note {0} not found")]
    NotFound(i64),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A write committed but the row could not be re-read inside the same
    /// transaction. Surfaced as an internal error, never as not-found.
    #[error("note {0} missing on re-read after write")]
    MissingAfterWrite(i64),

    #[error("blocking task failed: {0}")]
    Runtime(#[from] tokio::task::JoinError),
}
