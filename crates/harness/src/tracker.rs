use std::path::Path;

use chrono::{DateTime, Utc};

use watchlog_core::{Movie, Record, RecordKind, Show, Webcomic};
use watchlog_engine::{Engine, EngineError};
use watchlog_storage::{SqliteStore, StorageError};

pub struct TestTracker {
    pub engine: Engine,
}

impl TestTracker {
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            engine: Engine::new(SqliteStore::open_in_memory()?),
        })
    }

    pub fn with_undo_depth(depth: usize) -> Result<Self, StorageError> {
        Ok(Self {
            engine: Engine::with_undo_depth(SqliteStore::open_in_memory()?, depth),
        })
    }

    /// Open against a file-backed database, for tests that reopen it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Ok(Self {
            engine: Engine::new(SqliteStore::open(path)?),
        })
    }

    /// Run a listing and keep only the token a client would echo back.
    pub fn fetch_token(&mut self, kind: RecordKind) -> Result<DateTime<Utc>, EngineError> {
        let (_, token) = self.engine.fetch(kind)?;
        Ok(token)
    }

    /// Add a show with only the required fields set.
    pub fn add_show(&mut self, name: &str, status: &str) -> Result<Record, EngineError> {
        self.engine.submit(show(name, status), None)
    }

    /// Add a movie with only the required fields set.
    pub fn add_movie(&mut self, name: &str, status: &str) -> Result<Record, EngineError> {
        self.engine.submit(movie(name, status), None)
    }

    pub fn add_webcomic(&mut self, name: &str) -> Result<Record, EngineError> {
        self.engine.submit(webcomic(name), None)
    }
}

/// A show fixture with no id and every optional column empty.
pub fn show(name: &str, status: &str) -> Record {
    Record::Show(Show {
        id: None,
        name: name.to_string(),
        season: None,
        episode: None,
        status: status.to_string(),
        date_started: None,
        date_finished: None,
        last_updated: None,
    })
}

/// A movie fixture with no id and every optional column empty.
pub fn movie(name: &str, status: &str) -> Record {
    Record::Movie(Movie {
        id: None,
        name: name.to_string(),
        status: status.to_string(),
        date_watched: None,
        last_updated: None,
    })
}

pub fn webcomic(name: &str) -> Record {
    Record::Webcomic(Webcomic {
        id: None,
        name: name.to_string(),
        last_updated: None,
    })
}
