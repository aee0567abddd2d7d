//! # Songbase Inspect
//!
//! Read-only inspection of a song library, tag-reader messages and
//! device support.

pub mod db;
pub mod logging;
pub mod report;
