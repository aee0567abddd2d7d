//! Song <-> relational row conversion
//!
//! Rows are read positionally: the row id sits at a caller-supplied offset
//! (queries may select other columns first) and the song columns follow in
//! [`SONG_COLUMNS`] order. A row that ends early is decoded as far as it goes.

use super::columns::{column, SqlValue, FTS_COLUMNS, SONG_COLUMNS};
use crate::config::CodecContext;
use crate::song::Song;
use tracing::{error, warn};

/// Positional access to the values of one result row
pub trait RowSource {
    fn column_count(&self) -> usize;

    /// Value at `index`, `None` past the end of the row
    fn value(&self, index: usize) -> Option<SqlValue>;
}

impl RowSource for [SqlValue] {
    fn column_count(&self) -> usize {
        self.len()
    }

    fn value(&self, index: usize) -> Option<SqlValue> {
        self.get(index).cloned()
    }
}

impl RowSource for Vec<SqlValue> {
    fn column_count(&self) -> usize {
        self.len()
    }

    fn value(&self, index: usize) -> Option<SqlValue> {
        self.get(index).cloned()
    }
}

#[cfg(feature = "sqlx")]
impl RowSource for sqlx::sqlite::SqliteRow {
    fn column_count(&self) -> usize {
        sqlx::Row::len(self)
    }

    fn value(&self, index: usize) -> Option<SqlValue> {
        use sqlx::{Row, TypeInfo, ValueRef};

        // Only an out-of-range index ends the row
        let raw = self.try_get_raw(index).ok()?;
        if raw.is_null() {
            return Some(SqlValue::Null);
        }
        let type_name = raw.type_info().name().to_string();
        let decoded = match type_name.as_str() {
            "INTEGER" | "BOOLEAN" => self.try_get::<i64, _>(index).map(SqlValue::Integer),
            "REAL" => self.try_get::<f64, _>(index).map(|v| SqlValue::Integer(v as i64)),
            _ => self.try_get::<String, _>(index).map(SqlValue::Text),
        };
        Some(decoded.unwrap_or_else(|e| {
            warn!("Unreadable {} value in column {}, treating as NULL: {}", type_name, index, e);
            SqlValue::Null
        }))
    }
}

impl Song {
    /// Decode a song from a row whose id is at `offset`
    ///
    /// `reliable_metadata` records whether the row's tags came from a tag
    /// reader; it becomes [`Song::init_from_file`].
    pub fn from_row<R: RowSource + ?Sized>(
        row: &R,
        reliable_metadata: bool,
        offset: usize,
        ctx: &CodecContext,
    ) -> Song {
        let mut song = Song::new();
        song.set_id(row.value(offset).and_then(|v| v.as_i64()));

        for (i, column) in SONG_COLUMNS.iter().enumerate() {
            let index = offset + 1 + i;
            let Some(value) = row.value(index) else {
                error!(
                    "Song row ends at column {} of {} (missing '{}')",
                    index,
                    offset + 1 + SONG_COLUMNS.len(),
                    column.name
                );
                break;
            };
            column.read(&mut song, value, ctx);
        }

        song.finish_decode(reliable_metadata, ctx);
        song
    }

    /// Decode a song from `(column name, value)` pairs
    ///
    /// `ROWID` (or `id`) supplies the row id. Names outside the column table
    /// are reported and skipped.
    pub fn from_named_values(values: &[(&str, SqlValue)], reliable_metadata: bool, ctx: &CodecContext) -> Song {
        let mut song = Song::new();
        for (name, value) in values {
            if name.eq_ignore_ascii_case("rowid") || *name == "id" {
                song.set_id(value.as_i64());
                continue;
            }
            match column(name) {
                Some(column) => column.read(&mut song, value.clone(), ctx),
                None => warn!("Ignoring unknown song column '{}'", name),
            }
        }
        song.finish_decode(reliable_metadata, ctx);
        song
    }

    fn finish_decode(&mut self, reliable_metadata: bool, ctx: &CodecContext) {
        self.set_valid(true);
        self.set_init_from_file(reliable_metadata);
        self.set_basefilename(self.url().file_name());
        if let Some(cache) = &ctx.cover_cache_dir {
            self.init_art_manual(cache);
        }
    }

    /// Values for every song column, in table order
    pub fn to_row_values(&self, ctx: &CodecContext) -> Vec<SqlValue> {
        SONG_COLUMNS.iter().map(|c| c.write(self, ctx)).collect()
    }

    /// Values for the full-text columns, in table order
    pub fn to_fts_values(&self) -> Vec<SqlValue> {
        FTS_COLUMNS.iter().map(|(_, field)| SqlValue::text(field(self))).collect()
    }
}
