use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked show. Everything beyond the name and status is optional so
/// sparse rows round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub episode: Option<i64>,
    pub status: String,
    #[serde(default)]
    pub date_started: Option<NaiveDate>,
    #[serde(default)]
    pub date_finished: Option<NaiveDate>,
    #[serde(default, skip_deserializing)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub date_watched: Option<NaiveDate>,
    #[serde(default, skip_deserializing)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webcomic {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_deserializing)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Show,
    Movie,
    Webcomic,
}

impl RecordKind {
    /// Backing table for this kind.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Show => "shows",
            Self::Movie => "movies",
            Self::Webcomic => "webcomics",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Show => "show",
            Self::Movie => "movie",
            Self::Webcomic => "webcomic",
        })
    }
}

/// One full row from any of the tracked tables. Untagged so listings
/// serialize as plain objects; inbound payloads deserialize through the
/// concrete per-kind types instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Show(Show),
    Movie(Movie),
    Webcomic(Webcomic),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Show(_) => RecordKind::Show,
            Self::Movie(_) => RecordKind::Movie,
            Self::Webcomic(_) => RecordKind::Webcomic,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Show(show) => show.id,
            Self::Movie(movie) => movie.id,
            Self::Webcomic(comic) => comic.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Show(show) => &show.name,
            Self::Movie(movie) => &movie.name,
            Self::Webcomic(comic) => &comic.name,
        }
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Show(show) => show.last_updated,
            Self::Movie(movie) => movie.last_updated,
            Self::Webcomic(comic) => comic.last_updated,
        }
    }

    /// Stamp the server-managed modification time.
    pub fn set_last_updated(&mut self, stamp: DateTime<Utc>) {
        match self {
            Self::Show(show) => show.last_updated = Some(stamp),
            Self::Movie(movie) => movie.last_updated = Some(stamp),
            Self::Webcomic(comic) => comic.last_updated = Some(stamp),
        }
    }
}
