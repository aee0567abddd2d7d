//! Merge rules
//!
//! - Engine metadata (reported by the playback engine for tag-less streams)
//!   only ever fills in songs whose tags did not come from a tag reader.
//! - User data (play statistics and the manual cover) survives a rescan by
//!   being copied from the stale record onto the fresh one.

use super::Song;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Metadata reported by the playback engine, as text; empty means "not reported"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub comment: String,
    pub genre: String,
    pub bitrate: String,
    pub samplerate: String,
    pub bitdepth: String,
    /// Nanoseconds
    pub length: String,
    pub year: String,
    pub tracknr: String,
}

fn parse_field<T: FromStr>(name: &str, value: &str) -> Option<T> {
    if value.is_empty() {
        return None;
    }
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!("Ignoring unparsable engine metadata {}={:?}", name, value);
            None
        }
    }
}

impl Song {
    /// Fill in fields from engine-reported metadata
    ///
    /// Skipped entirely for trusted songs (loaded by a tag reader, or local
    /// files, whose tags are always read properly). Otherwise only non-empty
    /// incoming fields are applied. Returns whether the merge was applied.
    pub fn merge_from_engine_metadata(&mut self, bundle: &EngineMetadata) -> bool {
        if self.init_from_file() || self.url().is_local_file() {
            return false;
        }

        self.set_valid(true);
        if !bundle.title.is_empty() {
            self.set_title(bundle.title.as_str());
        }
        if !bundle.artist.is_empty() {
            self.set_artist(bundle.artist.as_str());
        }
        if !bundle.album.is_empty() {
            self.set_album(bundle.album.as_str());
        }
        if !bundle.comment.is_empty() {
            self.set_comment(bundle.comment.as_str());
        }
        if !bundle.genre.is_empty() {
            self.set_genre(bundle.genre.as_str());
        }
        if let Some(v) = parse_field::<i32>("bitrate", &bundle.bitrate) {
            self.set_bitrate(Some(v));
        }
        if let Some(v) = parse_field::<i32>("samplerate", &bundle.samplerate) {
            self.set_samplerate(Some(v));
        }
        if let Some(v) = parse_field::<i32>("bitdepth", &bundle.bitdepth) {
            self.set_bitdepth(Some(v));
        }
        if let Some(v) = parse_field::<i64>("length", &bundle.length) {
            self.set_length_nanosec(v);
        }
        if let Some(v) = parse_field::<i32>("year", &bundle.year) {
            self.set_year(Some(v));
        }
        if let Some(v) = parse_field::<i32>("tracknr", &bundle.tracknr) {
            self.set_track(Some(v));
        }
        true
    }

    /// Copy user-owned data (play statistics, manual cover) from `other`
    pub fn merge_user_set_data(&mut self, other: &Song) {
        self.set_playcount(other.playcount());
        self.set_skipcount(other.skipcount());
        self.set_lastplayed(other.lastplayed());
        self.set_art_manual(other.art_manual());
    }
}
