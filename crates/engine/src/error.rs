use chrono::{DateTime, Utc};
use thiserror::Error;
use watchlog_core::RecordKind;
use watchlog_storage::StorageError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: i64 },

    #[error("{kind} record has no id")]
    MissingId { kind: RecordKind },

    #[error("stale fetch time: presented {presented}, last fetch was {last_fetch}")]
    Stale {
        presented: DateTime<Utc>,
        last_fetch: DateTime<Utc>,
    },

    #[error("invalid fetch time: {0}")]
    InvalidFetchTime(#[from] chrono::ParseError),
}
