use watchlog_core::{Record, RecordKind};

use crate::error::StorageError;

/// Row-level persistence contract for the tracked tables. Every mutation
/// returns the full stored row so callers can capture state for inversion.
pub trait Store {
    /// Insert a record. A record without an id is assigned a fresh one; a
    /// record carrying an id is inserted at exactly that id, failing with
    /// `IdCollision` when the id is already taken.
    fn insert(&mut self, record: Record) -> Result<Record, StorageError>;

    /// Overwrite the row named by the record's id with the record's state.
    /// The record must carry an id.
    fn replace(&mut self, record: Record) -> Result<Record, StorageError>;

    fn delete(&mut self, kind: RecordKind, id: i64) -> Result<(), StorageError>;

    fn get(&self, kind: RecordKind, id: i64) -> Result<Option<Record>, StorageError>;

    /// All rows of one kind, ordered by id.
    fn list(&self, kind: RecordKind) -> Result<Vec<Record>, StorageError>;
}
