//! # Songbase Common Library
//!
//! Shared code for all songbase crates including:
//! - The canonical `Song` record, derived fields, equality and merge rules
//! - The relational row codec and SQLite song store
//! - The tag-reader wire message codec
//! - Configuration loading
//! - Human-readable time formatting

pub mod config;
pub mod db;
pub mod error;
pub mod human_time;
pub mod song;
pub mod wire;

pub use config::{CodecContext, InstallLayout, SongbaseConfig};
pub use error::{Error, Result};
pub use song::{FileType, Song, SongUrl};
