//! Song store operations
//!
//! Every write keeps `songs` and `songs_fts` in step inside one transaction.

use super::columns::{join_spec, SqlValue, BIND_SPEC, COLUMN_SPEC, FTS_BIND_SPEC, FTS_COLUMN_SPEC, FTS_UPDATE_SPEC, UPDATE_SPEC};
use super::schema::{SONGS_FTS_TABLE, SONGS_TABLE};
use crate::config::CodecContext;
use crate::song::{Song, SongUrl};
use crate::{Error, Result};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;
use tracing::debug;

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_values(mut query: SqliteQuery<'_>, values: Vec<SqlValue>) -> SqliteQuery<'_> {
    for value in values {
        query = match value {
            SqlValue::Null => query.bind(None::<i64>),
            SqlValue::Integer(v) => query.bind(v),
            SqlValue::Text(s) => query.bind(s),
        };
    }
    query
}

fn select_sql(filter: &str) -> String {
    format!("SELECT ROWID, {} FROM {} {}", *COLUMN_SPEC, SONGS_TABLE, filter)
}

/// Insert a song and its full-text row; the assigned id is stored on `song`
pub async fn insert_song(pool: &SqlitePool, song: &mut Song, ctx: &CodecContext) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let sql = format!("INSERT INTO {} ({}) VALUES ({})", SONGS_TABLE, *COLUMN_SPEC, *BIND_SPEC);
    let id = bind_values(sqlx::query(&sql), song.to_row_values(ctx))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    let fts_sql = format!(
        "INSERT INTO {} (ROWID, {}) VALUES (?, {})",
        SONGS_FTS_TABLE, *FTS_COLUMN_SPEC, *FTS_BIND_SPEC
    );
    bind_values(sqlx::query(&fts_sql).bind(id), song.to_fts_values())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    song.set_id(Some(id));
    debug!("Inserted song {} ({})", id, song.pretty_title());
    Ok(id)
}

/// Rewrite every column of a stored song
pub async fn update_song(pool: &SqlitePool, song: &Song, ctx: &CodecContext) -> Result<()> {
    let id = song
        .id()
        .ok_or_else(|| Error::InvalidInput(format!("Song '{}' has no id", song.pretty_title())))?;

    let mut tx = pool.begin().await?;

    let sql = format!("UPDATE {} SET {} WHERE ROWID = ?", SONGS_TABLE, *UPDATE_SPEC);
    let result = bind_values(sqlx::query(&sql), song.to_row_values(ctx))
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Song {}", id)));
    }

    let fts_sql = format!("UPDATE {} SET {} WHERE ROWID = ?", SONGS_FTS_TABLE, *FTS_UPDATE_SPEC);
    bind_values(sqlx::query(&fts_sql), song.to_fts_values())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    debug!("Updated song {}", id);
    Ok(())
}

pub async fn load_song(pool: &SqlitePool, id: i64, ctx: &CodecContext) -> Result<Song> {
    let row = sqlx::query(&select_sql("WHERE ROWID = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Song {}", id)))?;
    Ok(Song::from_row(&row, true, 0, ctx))
}

/// All songs stored at `url`; a cue sheet yields several per file
pub async fn load_songs_by_url(pool: &SqlitePool, url: &SongUrl, ctx: &CodecContext) -> Result<Vec<Song>> {
    let rows = sqlx::query(&select_sql("WHERE filename = ? ORDER BY beginning"))
        .bind(ctx.layout.storage_location(url))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(|row| Song::from_row(row, true, 0, ctx)).collect())
}

/// Songs in insertion order
pub async fn list_songs(pool: &SqlitePool, limit: Option<i64>, ctx: &CodecContext) -> Result<Vec<Song>> {
    let rows = sqlx::query(&select_sql("ORDER BY ROWID LIMIT ?"))
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(|row| Song::from_row(row, true, 0, ctx)).collect())
}

/// Full-text search; every word of `text` must prefix-match some text field
pub async fn search_songs(pool: &SqlitePool, text: &str, ctx: &CodecContext) -> Result<Vec<Song>> {
    let pattern = text
        .split_whitespace()
        .map(|word| format!("\"{}\"*", word.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ");
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {songs}.ROWID, {columns} FROM {songs} \
         JOIN {fts} ON {songs}.ROWID = {fts}.ROWID \
         WHERE {fts} MATCH ? ORDER BY rank",
        songs = SONGS_TABLE,
        fts = SONGS_FTS_TABLE,
        columns = join_spec(SONGS_TABLE),
    );
    let rows = sqlx::query(&sql).bind(pattern).fetch_all(pool).await?;
    Ok(rows.iter().map(|row| Song::from_row(row, true, 0, ctx)).collect())
}

pub async fn count_songs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", SONGS_TABLE))
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;
    use crate::song::{FileType, NSEC_PER_SEC};
    use std::path::Path;

    fn song(title: &str, artist: &str, album: &str, path: &str) -> Song {
        let mut song = Song::with_length(title, artist, album, 200 * NSEC_PER_SEC);
        song.set_url(SongUrl::from_local_file(Path::new(path)));
        song.set_filetype(FileType::Mpeg);
        song.set_year(Some(1991));
        song.set_track(Some(3));
        song
    }

    #[tokio::test]
    async fn test_insert_and_load_round_trip() {
        let pool = init_memory_database().await.unwrap();
        let ctx = CodecContext::default();

        let mut original = song("Smells Like Teen Spirit", "Nirvana", "Nevermind", "/music/nevermind/01.mp3");
        original.set_genre("Grunge");
        original.set_compilation_off(true);
        original.set_filesize(Some(5_000_000));
        let id = insert_song(&pool, &mut original, &ctx).await.unwrap();
        assert_eq!(original.id(), Some(id));

        let loaded = load_song(&pool, id, &ctx).await.unwrap();
        assert!(loaded.is_valid());
        assert_eq!(loaded.id(), Some(id));
        assert_eq!(loaded, original);
        assert!(loaded.is_metadata_equal(&original));
        assert_eq!(loaded.basefilename(), "01.mp3");
        assert_eq!(loaded.filesize(), Some(5_000_000));
        assert_eq!(loaded.filetype(), FileType::Mpeg);
        assert!(loaded.compilation_off());
        assert_eq!(loaded.lastplayed(), None);
    }

    #[tokio::test]
    async fn test_update_rewrites_song() {
        let pool = init_memory_database().await.unwrap();
        let ctx = CodecContext::default();

        let mut stored = song("Come As You Are", "Nirvana", "Nevermind", "/music/nevermind/03.mp3");
        let id = insert_song(&pool, &mut stored, &ctx).await.unwrap();

        stored.set_playcount(4);
        stored.set_lastplayed(Some(1_700_000_000));
        stored.set_title("Come as You Are");
        update_song(&pool, &stored, &ctx).await.unwrap();

        let loaded = load_song(&pool, id, &ctx).await.unwrap();
        assert_eq!(loaded.title(), "Come as You Are");
        assert_eq!(loaded.playcount(), 4);
        assert_eq!(loaded.lastplayed(), Some(1_700_000_000));

        let found = search_songs(&pool, "come as", &ctx).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), Some(id));
    }

    #[tokio::test]
    async fn test_update_without_id_or_row_fails() {
        let pool = init_memory_database().await.unwrap();
        let ctx = CodecContext::default();

        let mut unsaved = song("a", "b", "c", "/music/x.mp3");
        assert!(matches!(update_song(&pool, &unsaved, &ctx).await, Err(Error::InvalidInput(_))));

        unsaved.set_id(Some(404));
        assert!(matches!(update_song(&pool, &unsaved, &ctx).await, Err(Error::NotFound(_))));
        assert!(matches!(load_song(&pool, 404, &ctx).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_by_url_returns_cue_sections_in_order() {
        let pool = init_memory_database().await.unwrap();
        let ctx = CodecContext::default();
        let url = SongUrl::from_local_file(Path::new("/music/live/concert.flac"));

        for (title, beginning) in [("Encore", 600), ("Opener", 0), ("Middle", 300)] {
            let mut part = Song::with_bounds(title, "Band", "Live", beginning * NSEC_PER_SEC, Some((beginning + 300) * NSEC_PER_SEC));
            part.set_url(url.clone());
            part.set_cue_path("/music/live/concert.cue");
            insert_song(&pool, &mut part, &ctx).await.unwrap();
        }
        let mut other = song("Other", "Band", "Studio", "/music/studio/1.mp3");
        insert_song(&pool, &mut other, &ctx).await.unwrap();

        let parts = load_songs_by_url(&pool, &url, &ctx).await.unwrap();
        let titles: Vec<_> = parts.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Opener", "Middle", "Encore"]);
        assert!(parts.iter().all(|s| s.has_cue()));
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let pool = init_memory_database().await.unwrap();
        let ctx = CodecContext::default();

        for n in 1..=5 {
            let mut s = song(&format!("Track {}", n), "Artist", "Album", &format!("/music/{}.mp3", n));
            insert_song(&pool, &mut s, &ctx).await.unwrap();
        }

        assert_eq!(count_songs(&pool).await.unwrap(), 5);
        assert_eq!(list_songs(&pool, None, &ctx).await.unwrap().len(), 5);
        let first_two = list_songs(&pool, Some(2), &ctx).await.unwrap();
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two[0].title(), "Track 1");
    }

    #[tokio::test]
    async fn test_search_ignores_blank_query() {
        let pool = init_memory_database().await.unwrap();
        let ctx = CodecContext::default();
        assert!(search_songs(&pool, "   ", &ctx).await.unwrap().is_empty());
    }
}
