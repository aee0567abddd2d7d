//! Song library persistence
//!
//! [`columns`] and [`row_codec`] are storage-agnostic; the remaining modules
//! need the `sqlx` feature.

pub mod columns;
pub mod row_codec;

#[cfg(feature = "sqlx")]
pub mod init;
#[cfg(feature = "sqlx")]
pub mod schema;
#[cfg(feature = "sqlx")]
pub mod schema_sync;
#[cfg(feature = "sqlx")]
pub mod songs;

pub use columns::{Column, ColumnKind, SqlValue, FTS_COLUMNS, SONG_COLUMNS};
pub use row_codec::RowSource;

#[cfg(feature = "sqlx")]
pub use init::*;
#[cfg(feature = "sqlx")]
pub use songs::*;
