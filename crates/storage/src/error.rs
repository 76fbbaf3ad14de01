use thiserror::Error;

use watchlog_core::RecordKind;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: i64 },

    #[error("{kind} id already taken: {id}")]
    IdCollision { kind: RecordKind, id: i64 },

    #[error("{kind} record has no id")]
    MissingId { kind: RecordKind },
}
