//! Songs table definitions
//!
//! `songs` is derived from the column table; rows are addressed by SQLite's
//! implicit `ROWID`. `songs_fts` is an FTS5 table sharing those row ids.

use super::columns::{ColumnKind, FTS_COLUMN_SPEC, SONG_COLUMNS};
use super::schema_sync::{sync_table, ColumnDefinition, TableSchema};
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

pub const SONGS_TABLE: &str = "songs";
pub const SONGS_FTS_TABLE: &str = "songs_fts";

pub struct SongsTableSchema;

impl TableSchema for SongsTableSchema {
    fn table_name() -> &'static str {
        SONGS_TABLE
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        SONG_COLUMNS
            .iter()
            .map(|column| match column.kind {
                ColumnKind::Text => ColumnDefinition::new(column.name, "TEXT").not_null().default("''"),
                ColumnKind::Integer => ColumnDefinition::new(column.name, "INTEGER"),
                ColumnKind::Counter => ColumnDefinition::new(column.name, "INTEGER").not_null().default("0"),
            })
            .collect()
    }
}

async fn create_fts_table(pool: &SqlitePool) -> Result<()> {
    let sql = format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING fts5({}, tokenize = 'unicode61')",
        SONGS_FTS_TABLE, *FTS_COLUMN_SPEC
    );
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

/// Create or upgrade the song tables
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    let added = sync_table::<SongsTableSchema>(pool).await?;
    if added > 0 {
        info!("Added {} missing columns to '{}'", added, SONGS_TABLE);
    }
    create_fts_table(pool).await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_filename ON songs (filename)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_album ON songs (effective_albumartist, album)")
        .execute(pool)
        .await?;
    Ok(())
}
