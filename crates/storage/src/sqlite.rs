use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use watchlog_core::{Movie, Record, RecordKind, Show, Webcomic};

use crate::error::StorageError;
use crate::traits::Store;

const SHOW_COLUMNS: &str = "id, name, season, episode, status, date_started, date_finished, last_updated";
const MOVIE_COLUMNS: &str = "id, name, status, date_watched, last_updated";
const WEBCOMIC_COLUMNS: &str = "id, name, last_updated";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn insert_show(&self, mut show: Show) -> Result<Show, StorageError> {
        match show.id {
            Some(id) => {
                let result = self.conn.execute(
                    "INSERT INTO shows (id, name, season, episode, status, date_started, date_finished, last_updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    rusqlite::params![
                        id,
                        show.name,
                        show.season,
                        show.episode,
                        show.status,
                        show.date_started,
                        show.date_finished,
                        show.last_updated,
                    ],
                );
                check_insert(result, RecordKind::Show, id)?;
            }
            None => {
                self.conn.execute(
                    "INSERT INTO shows (name, season, episode, status, date_started, date_finished, last_updated) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    rusqlite::params![
                        show.name,
                        show.season,
                        show.episode,
                        show.status,
                        show.date_started,
                        show.date_finished,
                        show.last_updated,
                    ],
                )?;
                show.id = Some(self.conn.last_insert_rowid());
            }
        }
        Ok(show)
    }

    fn insert_movie(&self, mut movie: Movie) -> Result<Movie, StorageError> {
        match movie.id {
            Some(id) => {
                let result = self.conn.execute(
                    "INSERT INTO movies (id, name, status, date_watched, last_updated) VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        id,
                        movie.name,
                        movie.status,
                        movie.date_watched,
                        movie.last_updated,
                    ],
                );
                check_insert(result, RecordKind::Movie, id)?;
            }
            None => {
                self.conn.execute(
                    "INSERT INTO movies (name, status, date_watched, last_updated) VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![
                        movie.name,
                        movie.status,
                        movie.date_watched,
                        movie.last_updated,
                    ],
                )?;
                movie.id = Some(self.conn.last_insert_rowid());
            }
        }
        Ok(movie)
    }

    fn insert_webcomic(&self, mut comic: Webcomic) -> Result<Webcomic, StorageError> {
        match comic.id {
            Some(id) => {
                let result = self.conn.execute(
                    "INSERT INTO webcomics (id, name, last_updated) VALUES (?1, ?2, ?3)",
                    rusqlite::params![id, comic.name, comic.last_updated],
                );
                check_insert(result, RecordKind::Webcomic, id)?;
            }
            None => {
                self.conn.execute(
                    "INSERT INTO webcomics (name, last_updated) VALUES (?1, ?2)",
                    rusqlite::params![comic.name, comic.last_updated],
                )?;
                comic.id = Some(self.conn.last_insert_rowid());
            }
        }
        Ok(comic)
    }

    fn replace_show(&self, show: Show, id: i64) -> Result<Show, StorageError> {
        let rows = self.conn.execute(
            "UPDATE shows SET name = ?1, season = ?2, episode = ?3, status = ?4, date_started = ?5, date_finished = ?6, last_updated = ?7 WHERE id = ?8",
            rusqlite::params![
                show.name,
                show.season,
                show.episode,
                show.status,
                show.date_started,
                show.date_finished,
                show.last_updated,
                id,
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::NotFound {
                kind: RecordKind::Show,
                id,
            });
        }
        Ok(show)
    }

    fn replace_movie(&self, movie: Movie, id: i64) -> Result<Movie, StorageError> {
        let rows = self.conn.execute(
            "UPDATE movies SET name = ?1, status = ?2, date_watched = ?3, last_updated = ?4 WHERE id = ?5",
            rusqlite::params![
                movie.name,
                movie.status,
                movie.date_watched,
                movie.last_updated,
                id,
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::NotFound {
                kind: RecordKind::Movie,
                id,
            });
        }
        Ok(movie)
    }

    fn replace_webcomic(&self, comic: Webcomic, id: i64) -> Result<Webcomic, StorageError> {
        let rows = self.conn.execute(
            "UPDATE webcomics SET name = ?1, last_updated = ?2 WHERE id = ?3",
            rusqlite::params![comic.name, comic.last_updated, id],
        )?;
        if rows == 0 {
            return Err(StorageError::NotFound {
                kind: RecordKind::Webcomic,
                id,
            });
        }
        Ok(comic)
    }
}

fn read_show(row: &rusqlite::Row) -> rusqlite::Result<Record> {
    Ok(Record::Show(Show {
        id: row.get(0)?,
        name: row.get(1)?,
        season: row.get(2)?,
        episode: row.get(3)?,
        status: row.get(4)?,
        date_started: row.get(5)?,
        date_finished: row.get(6)?,
        last_updated: row.get(7)?,
    }))
}

fn read_movie(row: &rusqlite::Row) -> rusqlite::Result<Record> {
    Ok(Record::Movie(Movie {
        id: row.get(0)?,
        name: row.get(1)?,
        status: row.get(2)?,
        date_watched: row.get(3)?,
        last_updated: row.get(4)?,
    }))
}

fn read_webcomic(row: &rusqlite::Row) -> rusqlite::Result<Record> {
    Ok(Record::Webcomic(Webcomic {
        id: row.get(0)?,
        name: row.get(1)?,
        last_updated: row.get(2)?,
    }))
}

fn columns(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Show => SHOW_COLUMNS,
        RecordKind::Movie => MOVIE_COLUMNS,
        RecordKind::Webcomic => WEBCOMIC_COLUMNS,
    }
}

fn row_reader(kind: RecordKind) -> fn(&rusqlite::Row) -> rusqlite::Result<Record> {
    match kind {
        RecordKind::Show => read_show,
        RecordKind::Movie => read_movie,
        RecordKind::Webcomic => read_webcomic,
    }
}

fn require_id(record: &Record) -> Result<i64, StorageError> {
    record.id().ok_or(StorageError::MissingId {
        kind: record.kind(),
    })
}

/// Map a unique-constraint failure on an explicit-id insert to IdCollision.
fn check_insert(
    result: rusqlite::Result<usize>,
    kind: RecordKind,
    id: i64,
) -> Result<(), StorageError> {
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StorageError::IdCollision { kind, id })
        }
        Err(e) => Err(StorageError::Sqlite(e)),
    }
}

impl Store for SqliteStore {
    fn insert(&mut self, record: Record) -> Result<Record, StorageError> {
        match record {
            Record::Show(show) => self.insert_show(show).map(Record::Show),
            Record::Movie(movie) => self.insert_movie(movie).map(Record::Movie),
            Record::Webcomic(comic) => self.insert_webcomic(comic).map(Record::Webcomic),
        }
    }

    fn replace(&mut self, record: Record) -> Result<Record, StorageError> {
        let id = require_id(&record)?;
        match record {
            Record::Show(show) => self.replace_show(show, id).map(Record::Show),
            Record::Movie(movie) => self.replace_movie(movie, id).map(Record::Movie),
            Record::Webcomic(comic) => self.replace_webcomic(comic, id).map(Record::Webcomic),
        }
    }

    fn delete(&mut self, kind: RecordKind, id: i64) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table_name());
        let rows = self.conn.execute(&sql, rusqlite::params![id])?;
        if rows == 0 {
            return Err(StorageError::NotFound { kind, id });
        }
        Ok(())
    }

    fn get(&self, kind: RecordKind, id: i64) -> Result<Option<Record>, StorageError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            columns(kind),
            kind.table_name()
        );
        let record = self
            .conn
            .query_row(&sql, rusqlite::params![id], row_reader(kind))
            .optional()?;
        Ok(record)
    }

    fn list(&self, kind: RecordKind) -> Result<Vec<Record>, StorageError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            columns(kind),
            kind.table_name()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], row_reader(kind))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, SubsecRound, Utc};

    fn sample_show(name: &str) -> Show {
        Show {
            id: None,
            name: name.into(),
            season: Some(1),
            episode: Some(4),
            status: "Watching".into(),
            date_started: NaiveDate::from_ymd_opt(2024, 3, 9),
            date_finished: None,
            last_updated: Some(Utc::now().trunc_subsecs(6)),
        }
    }

    fn sample_movie(name: &str) -> Movie {
        Movie {
            id: None,
            name: name.into(),
            status: "Completed".into(),
            date_watched: NaiveDate::from_ymd_opt(2023, 11, 18),
            last_updated: Some(Utc::now().trunc_subsecs(6)),
        }
    }

    #[test]
    fn insert_assigns_sequential_ids() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let first = store.insert(Record::Show(sample_show("Planetes")))?;
        let second = store.insert(Record::Show(sample_show("Kaiba")))?;

        assert_eq!(first.id(), Some(1), "first insert should take id 1");
        assert_eq!(second.id(), Some(2), "second insert should take id 2");
        Ok(())
    }

    #[test]
    fn show_round_trips_every_column() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let mut show = sample_show("Mushishi");
        show.date_finished = NaiveDate::from_ymd_opt(2024, 6, 2);
        let stored = store.insert(Record::Show(show))?;
        let id = stored.id().ok_or("stored record missing id")?;

        let fetched = store.get(RecordKind::Show, id)?.ok_or("row missing")?;
        assert_eq!(fetched, stored, "every column should survive a round trip");
        Ok(())
    }

    #[test]
    fn insert_at_explicit_id_and_collision() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let mut show = sample_show("Dennou Coil");
        show.id = Some(42);
        let stored = store.insert(Record::Show(show.clone()))?;
        assert_eq!(stored.id(), Some(42));
        assert!(store.get(RecordKind::Show, 42)?.is_some());

        let err = store.insert(Record::Show(show)).unwrap_err();
        assert!(
            matches!(err, StorageError::IdCollision { id: 42, .. }),
            "reusing a live id should collide, got: {err}"
        );
        Ok(())
    }

    #[test]
    fn replace_overwrites_row() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let stored = store.insert(Record::Show(sample_show("Hyouka")))?;
        let id = stored.id().ok_or("stored record missing id")?;

        let mut updated = sample_show("Hyouka");
        updated.id = Some(id);
        updated.status = "Completed".into();
        updated.episode = Some(22);
        let replaced = store.replace(Record::Show(updated))?;

        let fetched = store.get(RecordKind::Show, id)?.ok_or("row missing")?;
        assert_eq!(fetched, replaced);
        Ok(())
    }

    #[test]
    fn replace_missing_row_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let mut show = sample_show("Texhnolyze");
        show.id = Some(99);
        let err = store.replace(Record::Show(show)).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 99, .. }));
        Ok(())
    }

    #[test]
    fn replace_without_id_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let err = store.replace(Record::Show(sample_show("Kemonozume"))).unwrap_err();
        assert!(matches!(err, StorageError::MissingId { .. }));
        Ok(())
    }

    #[test]
    fn delete_removes_row() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let stored = store.insert(Record::Movie(sample_movie("Redline")))?;
        let id = stored.id().ok_or("stored record missing id")?;

        store.delete(RecordKind::Movie, id)?;
        assert!(store.get(RecordKind::Movie, id)?.is_none());

        let err = store.delete(RecordKind::Movie, id).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        Ok(())
    }

    #[test]
    fn list_orders_by_id() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let mut early = sample_show("Aria");
        early.id = Some(5);
        store.insert(Record::Show(early))?;
        let mut late = sample_show("Baccano");
        late.id = Some(2);
        store.insert(Record::Show(late))?;
        store.insert(Record::Show(sample_show("Clannad")))?;

        let ids: Vec<Option<i64>> = store
            .list(RecordKind::Show)?
            .iter()
            .map(Record::id)
            .collect();
        assert_eq!(ids, vec![Some(2), Some(5), Some(6)]);
        Ok(())
    }

    #[test]
    fn movie_and_webcomic_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let mut store = SqliteStore::open_in_memory()?;

        let movie = store.insert(Record::Movie(sample_movie("Paprika")))?;
        let movie_id = movie.id().ok_or("movie missing id")?;
        assert_eq!(store.get(RecordKind::Movie, movie_id)?, Some(movie));

        let comic = store.insert(Record::Webcomic(Webcomic {
            id: None,
            name: "Kill Six Billion Demons".into(),
            last_updated: Some(Utc::now().trunc_subsecs(6)),
        }))?;
        let comic_id = comic.id().ok_or("comic missing id")?;
        assert_eq!(store.get(RecordKind::Webcomic, comic_id)?, Some(comic));
        Ok(())
    }

    #[test]
    fn rows_survive_reopen() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("watchlog.db");

        {
            let mut store = SqliteStore::open(&path)?;
            store.insert(Record::Show(sample_show("Shirobako")))?;
        }

        let store = SqliteStore::open(&path)?;
        let records = store.list(RecordKind::Show)?;
        assert_eq!(records.len(), 1, "row should persist across reopen");
        assert_eq!(records[0].name(), "Shirobako");
        Ok(())
    }
}
