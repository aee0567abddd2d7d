//! Read-only access to a song library

use anyhow::{Context, Result};
use songbase_common::db::schema::SONGS_TABLE;
use songbase_common::db::schema_sync::table_exists;
use sqlx::SqlitePool;
use std::path::Path;

/// Connect to an existing library without write access
///
/// Fails when the file is missing or holds no `songs` table.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!("Database not found: {}", db_path.display());
    }

    // immutable=1: no locking or WAL index, the file is only read
    let db_url = format!("sqlite://{}?mode=ro&immutable=1", db_path.display());
    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to connect to database in read-only mode")?;

    if !table_exists(&pool, SONGS_TABLE).await? {
        anyhow::bail!("{} is not a song library (no '{}' table)", db_path.display(), SONGS_TABLE);
    }
    Ok(pool)
}
