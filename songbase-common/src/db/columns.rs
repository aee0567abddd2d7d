//! Song column table
//!
//! One ordered table drives every row conversion: positional decoding,
//! name-driven decoding, parameter binding, and the statement fragments used
//! to build `INSERT`/`UPDATE`/`SELECT` text. Each entry pairs a column name
//! with its reader and writer, so adding a column is a one-line change here
//! plus automatic `ALTER TABLE` on existing databases (see `schema_sync`).
//!
//! Integer columns store unknown values as NULL. Text columns are never NULL.

use crate::config::CodecContext;
use crate::song::{FileType, Song};
use once_cell::sync::Lazy;

/// A single SQL value as read from or bound to a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

impl SqlValue {
    pub fn text(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }

    pub fn flag(value: bool) -> Self {
        SqlValue::Integer(i64::from(value))
    }

    /// Known value: `None` maps to NULL
    pub fn known(value: Option<i64>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Integer)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Integer content; numeric text is accepted
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Null => None,
            SqlValue::Integer(v) => Some(*v),
            SqlValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Non-negative integer content
    pub fn as_known_i64(&self) -> Option<i64> {
        self.as_i64().filter(|v| *v >= 0)
    }

    pub fn as_known_i32(&self) -> Option<i32> {
        self.as_known_i64().and_then(|v| i32::try_from(v).ok())
    }

    pub fn as_bool(&self) -> bool {
        self.as_i64().is_some_and(|v| v != 0)
    }

    /// Text content; NULL reads as empty
    pub fn into_text(self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Integer(v) => v.to_string(),
            SqlValue::Text(s) => s,
        }
    }
}

/// Storage class of a column, used to derive its SQL definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// `TEXT NOT NULL DEFAULT ''`
    Text,
    /// Nullable `INTEGER`, NULL meaning unknown
    Integer,
    /// `INTEGER NOT NULL DEFAULT 0`: booleans, counters and `beginning`
    Counter,
}

type ReadFn = fn(&mut Song, SqlValue, &CodecContext);
type WriteFn = fn(&Song, &CodecContext) -> SqlValue;

/// One entry of the song column table
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// `None` for write-only (derived) columns
    read: Option<ReadFn>,
    write: WriteFn,
}

impl Column {
    const fn new(name: &'static str, kind: ColumnKind, read: ReadFn, write: WriteFn) -> Self {
        Self {
            name,
            kind,
            read: Some(read),
            write,
        }
    }

    const fn derived(name: &'static str, kind: ColumnKind, write: WriteFn) -> Self {
        Self {
            name,
            kind,
            read: None,
            write,
        }
    }

    pub fn is_derived(&self) -> bool {
        self.read.is_none()
    }

    /// Apply a stored value to `song`; derived columns are ignored
    pub fn read(&self, song: &mut Song, value: SqlValue, ctx: &CodecContext) {
        if let Some(read) = self.read {
            read(song, value, ctx);
        }
    }

    pub fn write(&self, song: &Song, ctx: &CodecContext) -> SqlValue {
        (self.write)(song, ctx)
    }
}

fn tag_int(value: Option<i32>) -> SqlValue {
    SqlValue::known(value.map(i64::from))
}

fn counter(value: &SqlValue) -> u32 {
    value
        .as_known_i64()
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

use ColumnKind::{Counter, Integer, Text};

/// Song columns in storage order
pub static SONG_COLUMNS: [Column; 38] = [
    Column::new("title", Text, |s, v, _| s.set_title(v.into_text()), |s, _| SqlValue::text(s.title())),
    Column::new("album", Text, |s, v, _| s.set_album(v.into_text()), |s, _| SqlValue::text(s.album())),
    Column::new("artist", Text, |s, v, _| s.set_artist(v.into_text()), |s, _| SqlValue::text(s.artist())),
    Column::new("albumartist", Text, |s, v, _| s.set_albumartist(v.into_text()), |s, _| {
        SqlValue::text(s.albumartist())
    }),
    Column::new("track", Integer, |s, v, _| s.set_track(v.as_known_i32()), |s, _| tag_int(s.track())),
    Column::new("disc", Integer, |s, v, _| s.set_disc(v.as_known_i32()), |s, _| tag_int(s.disc())),
    Column::new("year", Integer, |s, v, _| s.set_year(v.as_known_i32()), |s, _| tag_int(s.year())),
    Column::new("originalyear", Integer, |s, v, _| s.set_originalyear(v.as_known_i32()), |s, _| {
        tag_int(s.originalyear())
    }),
    Column::new("genre", Text, |s, v, _| s.set_genre(v.into_text()), |s, _| SqlValue::text(s.genre())),
    Column::new("compilation", Counter, |s, v, _| s.set_compilation(v.as_bool()), |s, _| {
        SqlValue::flag(s.compilation())
    }),
    Column::new("composer", Text, |s, v, _| s.set_composer(v.into_text()), |s, _| SqlValue::text(s.composer())),
    Column::new("performer", Text, |s, v, _| s.set_performer(v.into_text()), |s, _| {
        SqlValue::text(s.performer())
    }),
    Column::new("grouping", Text, |s, v, _| s.set_grouping(v.into_text()), |s, _| SqlValue::text(s.grouping())),
    Column::new("comment", Text, |s, v, _| s.set_comment(v.into_text()), |s, _| SqlValue::text(s.comment())),
    Column::new("beginning", Counter, |s, v, _| s.set_beginning_nanosec(v.as_i64().unwrap_or(0)), |s, _| {
        SqlValue::Integer(s.beginning_nanosec())
    }),
    // Stored after `beginning`, so the end is computed from the decoded beginning
    Column::new("length", Integer, |s, v, _| s.set_length_nanosec(v.as_i64().unwrap_or(-1)), |s, _| {
        SqlValue::known(s.length_nanosec())
    }),
    Column::new("bitrate", Integer, |s, v, _| s.set_bitrate(v.as_known_i32()), |s, _| tag_int(s.bitrate())),
    Column::new("samplerate", Integer, |s, v, _| s.set_samplerate(v.as_known_i32()), |s, _| {
        tag_int(s.samplerate())
    }),
    Column::new("bitdepth", Integer, |s, v, _| s.set_bitdepth(v.as_known_i32()), |s, _| tag_int(s.bitdepth())),
    Column::new("directory_id", Integer, |s, v, _| s.set_directory_id(v.as_known_i64()), |s, _| {
        SqlValue::known(s.directory_id())
    }),
    Column::new(
        "filename",
        Text,
        |s, v, ctx| s.set_url(ctx.layout.resolve_location(&v.into_text())),
        |s, ctx| SqlValue::Text(ctx.layout.storage_location(s.url())),
    ),
    Column::new(
        "filetype",
        Counter,
        |s, v, _| s.set_filetype(FileType::from_code(v.as_i64().unwrap_or(0))),
        |s, _| SqlValue::Integer(i64::from(s.filetype().code())),
    ),
    Column::new("filesize", Integer, |s, v, _| s.set_filesize(v.as_known_i64()), |s, _| {
        SqlValue::known(s.filesize())
    }),
    Column::new("mtime", Integer, |s, v, _| s.set_mtime(v.as_known_i64()), |s, _| SqlValue::known(s.mtime())),
    Column::new("ctime", Integer, |s, v, _| s.set_ctime(v.as_known_i64()), |s, _| SqlValue::known(s.ctime())),
    Column::new("unavailable", Counter, |s, v, _| s.set_unavailable(v.as_bool()), |s, _| {
        SqlValue::flag(s.is_unavailable())
    }),
    Column::new("playcount", Counter, |s, v, _| s.set_playcount(counter(&v)), |s, _| {
        SqlValue::Integer(i64::from(s.playcount()))
    }),
    Column::new("skipcount", Counter, |s, v, _| s.set_skipcount(counter(&v)), |s, _| {
        SqlValue::Integer(i64::from(s.skipcount()))
    }),
    Column::new("lastplayed", Integer, |s, v, _| s.set_lastplayed(v.as_known_i64()), |s, _| {
        SqlValue::known(s.lastplayed())
    }),
    Column::new("compilation_detected", Counter, |s, v, _| s.set_compilation_detected(v.as_bool()), |s, _| {
        SqlValue::flag(s.compilation_detected())
    }),
    Column::new("compilation_on", Counter, |s, v, _| s.set_compilation_on(v.as_bool()), |s, _| {
        SqlValue::flag(s.compilation_on())
    }),
    Column::new("compilation_off", Counter, |s, v, _| s.set_compilation_off(v.as_bool()), |s, _| {
        SqlValue::flag(s.compilation_off())
    }),
    Column::derived("compilation_effective", Counter, |s, _| SqlValue::flag(s.is_compilation())),
    Column::new("art_automatic", Text, |s, v, _| s.set_art_automatic(v.into_text()), |s, _| {
        SqlValue::text(s.art_automatic())
    }),
    Column::new("art_manual", Text, |s, v, _| s.set_art_manual(v.into_text()), |s, _| {
        SqlValue::text(s.art_manual())
    }),
    Column::derived("effective_albumartist", Text, |s, _| SqlValue::text(s.effective_albumartist())),
    Column::derived("effective_originalyear", Integer, |s, _| tag_int(s.effective_originalyear())),
    Column::new("cue_path", Text, |s, v, _| s.set_cue_path(v.into_text()), |s, _| SqlValue::text(s.cue_path())),
];

/// Full-text search columns, parallel to their source fields
pub static FTS_COLUMNS: [(&str, fn(&Song) -> &str); 9] = [
    ("ftstitle", Song::title),
    ("ftsalbum", Song::album),
    ("ftsartist", Song::artist),
    ("ftsalbumartist", Song::albumartist),
    ("ftscomposer", Song::composer),
    ("ftsperformer", Song::performer),
    ("ftsgrouping", Song::grouping),
    ("ftsgenre", Song::genre),
    ("ftscomment", Song::comment),
];

/// Look up a song column by name
pub fn column(name: &str) -> Option<&'static Column> {
    SONG_COLUMNS.iter().find(|c| c.name == name)
}

fn names() -> impl Iterator<Item = &'static str> {
    SONG_COLUMNS.iter().map(|c| c.name)
}

fn fts_names() -> impl Iterator<Item = &'static str> {
    FTS_COLUMNS.iter().map(|(name, _)| *name)
}

fn join<'a>(parts: impl Iterator<Item = &'a str>, map: impl Fn(&str) -> String) -> String {
    parts.map(map).collect::<Vec<_>>().join(", ")
}

/// `title, album, ...`
pub static COLUMN_SPEC: Lazy<String> = Lazy::new(|| join(names(), str::to_string));
/// `?, ?, ...`
pub static BIND_SPEC: Lazy<String> = Lazy::new(|| join(names(), |_| "?".to_string()));
/// `title = ?, album = ?, ...`
pub static UPDATE_SPEC: Lazy<String> = Lazy::new(|| join(names(), |n| format!("{} = ?", n)));

pub static FTS_COLUMN_SPEC: Lazy<String> = Lazy::new(|| join(fts_names(), str::to_string));
pub static FTS_BIND_SPEC: Lazy<String> = Lazy::new(|| join(fts_names(), |_| "?".to_string()));
pub static FTS_UPDATE_SPEC: Lazy<String> = Lazy::new(|| join(fts_names(), |n| format!("{} = ?", n)));

/// Table-qualified column list, e.g. `songs.title, songs.album, ...`
pub fn join_spec(table: &str) -> String {
    join(names(), |n| format!("{}.{}", table, n))
}
