//! Declarative table schemas and column synchronization
//!
//! A table is described once in code ([`TableSchema`]). On startup the table
//! is created if missing, then compared against `PRAGMA table_info` and any
//! missing columns are added with `ALTER TABLE ... ADD COLUMN`. Databases
//! written by older builds therefore pick up new song columns automatically.
//!
//! Type changes and removed columns are only reported; SQLite cannot alter
//! them in place.

use crate::Result;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};

/// Column definition with SQL constraints
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    /// SQL type (e.g. "TEXT", "INTEGER")
    pub sql_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            not_null: false,
            default_value: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Definition text as used in `CREATE TABLE` and `ADD COLUMN`
    fn sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);
        // SQLite rejects an added NOT NULL column without a default
        if self.not_null && self.default_value.is_some() {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default_value {
            sql.push_str(&format!(" DEFAULT {}", default));
        }
        sql
    }
}

/// Column as reported by `PRAGMA table_info`
#[derive(Debug, Clone)]
pub struct ActualColumn {
    pub name: String,
    pub type_name: String,
}

/// Difference between the declared and the actual table
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDrift {
    MissingColumn(ColumnDefinition),
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },
}

/// Expected schema of one table
pub trait TableSchema {
    fn table_name() -> &'static str;

    /// Columns in creation order
    fn expected_columns() -> Vec<ColumnDefinition>;

    fn create_table_sql() -> String {
        let columns: Vec<String> = Self::expected_columns().iter().map(ColumnDefinition::sql).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            Self::table_name(),
            columns.join(",\n    ")
        )
    }
}

pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn introspect_table(pool: &SqlitePool, table_name: &str) -> Result<Vec<ActualColumn>> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", table_name))
        .fetch_all(pool)
        .await?;

    let mut columns: Vec<(i64, ActualColumn)> = rows
        .iter()
        .map(|row| {
            (
                row.get::<i64, _>("cid"),
                ActualColumn {
                    name: row.get("name"),
                    type_name: row.get("type"),
                },
            )
        })
        .collect();
    columns.sort_by_key(|(cid, _)| *cid);
    Ok(columns.into_iter().map(|(_, c)| c).collect())
}

/// Compare declared columns against the database
pub fn diff(expected: &[ColumnDefinition], actual: &[ActualColumn]) -> Vec<SchemaDrift> {
    expected
        .iter()
        .filter_map(|column| match actual.iter().find(|a| a.name.eq_ignore_ascii_case(&column.name)) {
            None => Some(SchemaDrift::MissingColumn(column.clone())),
            Some(found) if !same_affinity(&column.sql_type, &found.type_name) => Some(SchemaDrift::TypeMismatch {
                column: column.name.clone(),
                expected: column.sql_type.clone(),
                actual: found.type_name.clone(),
            }),
            Some(_) => None,
        })
        .collect()
}

/// SQLite type affinity: INTEGER, TEXT, REAL or BLOB/NUMERIC
fn affinity(sql_type: &str) -> &'static str {
    let t = sql_type.to_uppercase();
    if t.contains("INT") {
        "INTEGER"
    } else if t.contains("CHAR") || t.contains("CLOB") || t.contains("TEXT") {
        "TEXT"
    } else if t.contains("REAL") || t.contains("FLOA") || t.contains("DOUB") {
        "REAL"
    } else if t.is_empty() || t.contains("BLOB") {
        "BLOB"
    } else {
        "NUMERIC"
    }
}

fn same_affinity(expected: &str, actual: &str) -> bool {
    affinity(expected) == affinity(actual)
}

/// Create the table if needed, then add any missing columns
///
/// Returns the number of columns added.
pub async fn sync_table<T: TableSchema>(pool: &SqlitePool) -> Result<usize> {
    let table = T::table_name();
    sqlx::query(&T::create_table_sql()).execute(pool).await?;

    let actual = introspect_table(pool, table).await?;
    let drift = diff(&T::expected_columns(), &actual);
    if drift.is_empty() {
        debug!("Schema up to date for '{}'", table);
        return Ok(0);
    }

    let mut added = 0;
    for change in drift {
        match change {
            SchemaDrift::MissingColumn(column) => {
                add_column(pool, table, &column).await?;
                added += 1;
            }
            SchemaDrift::TypeMismatch { column, expected, actual } => {
                warn!(
                    "Type mismatch in {}.{}: expected '{}', found '{}'",
                    table, column, expected, actual
                );
            }
        }
    }
    Ok(added)
}

async fn add_column(pool: &SqlitePool, table: &str, column: &ColumnDefinition) -> Result<()> {
    if column.not_null && column.default_value.is_none() {
        warn!("Adding {}.{} as nullable: NOT NULL needs a default", table, column.name);
    }
    let sql = format!("ALTER TABLE {} ADD COLUMN {}", table, column.sql());

    match sqlx::query(&sql).execute(pool).await {
        Ok(_) => {
            info!("Added column {}.{} ({})", table, column.name, column.sql_type);
            Ok(())
        }
        // Another connection got there first
        Err(sqlx::Error::Database(e)) if e.message().contains("duplicate column") => Ok(()),
        Err(e) => Err(e.into()),
    }
}
