//! Identity, equality and album grouping
//!
//! Four comparisons with different purposes, never interchangeable:
//!
//! | Comparison | Fields | Used for |
//! |---|---|---|
//! | `==` / `Hash` | url, beginning | map keys; cue-split tracks share a url |
//! | [`Song::is_metadata_equal`] | tag-origin fields | did a rescan change anything |
//! | [`Song::is_similar`] | title, artist (case-insensitive) | loose lookups (covers, lyrics) |
//! | [`Song::album_key`] | compilation, album artist, cue, album | bucketing into albums |

use super::{Song, SongUrl};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

const COMPILATION_MARKER: &str = "_compilation";

/// Strict identity of a song: its location and offset into the media
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongIdentity {
    pub url: SongUrl,
    pub beginning_nanosec: i64,
}

/// Hash key consistent with [`Song::is_similar`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimilarityKey {
    title: String,
    artist: String,
}

/// Album grouping key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumKey(String);

impl AlbumKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlbumKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.url() == other.url() && self.beginning_nanosec() == other.beginning_nanosec()
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Same fields as PartialEq
        self.url().hash(state);
        self.beginning_nanosec().hash(state);
    }
}

impl Song {
    pub fn identity(&self) -> SongIdentity {
        SongIdentity {
            url: self.url().clone(),
            beginning_nanosec: self.beginning_nanosec(),
        }
    }

    /// Equality over tag-origin fields; ignores id, location and play statistics
    pub fn is_metadata_equal(&self, other: &Song) -> bool {
        self.title() == other.title()
            && self.album() == other.album()
            && self.artist() == other.artist()
            && self.albumartist() == other.albumartist()
            && self.composer() == other.composer()
            && self.performer() == other.performer()
            && self.grouping() == other.grouping()
            && self.track() == other.track()
            && self.disc() == other.disc()
            && self.year() == other.year()
            && self.originalyear() == other.originalyear()
            && self.genre() == other.genre()
            && self.comment() == other.comment()
            && self.compilation() == other.compilation()
            && self.beginning_nanosec() == other.beginning_nanosec()
            && self.length_nanosec() == other.length_nanosec()
            && self.bitrate() == other.bitrate()
            && self.samplerate() == other.samplerate()
            && self.bitdepth() == other.bitdepth()
            && self.art_automatic() == other.art_automatic()
            && self.art_manual() == other.art_manual()
            && self.cue_path() == other.cue_path()
    }

    /// Case-insensitive equality of title and artist
    pub fn is_similar(&self, other: &Song) -> bool {
        self.similarity_key() == other.similarity_key()
    }

    pub fn similarity_key(&self) -> SimilarityKey {
        SimilarityKey {
            title: self.title().to_lowercase(),
            artist: self.artist().to_lowercase(),
        }
    }

    /// Key used to bucket songs into albums
    ///
    /// Compilations group by cue sheet when they have one, otherwise by album
    /// title; every other song groups by album artist, cue sheet and album.
    pub fn album_key(&self) -> AlbumKey {
        let key = if self.is_compilation() {
            if self.has_cue() {
                format!("{}|{}|", COMPILATION_MARKER, self.cue_path())
            } else {
                format!("{}||{}", COMPILATION_MARKER, self.effective_album())
            }
        } else {
            format!(
                "{}|{}|{}",
                self.effective_albumartist(),
                self.cue_path(),
                self.effective_album()
            )
        };
        AlbumKey(key)
    }

    /// Pairwise album membership test
    pub fn is_on_same_album(&self, other: &Song) -> bool {
        if self.is_compilation() != other.is_compilation() {
            return false;
        }
        if self.has_cue() && other.has_cue() && self.cue_path() == other.cue_path() {
            return true;
        }
        if self.is_compilation() && self.album() == other.album() {
            return true;
        }
        self.effective_album() == other.effective_album()
            && self.effective_albumartist() == other.effective_albumartist()
    }
}
