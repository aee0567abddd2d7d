//! Derived fields
//!
//! Pure functions over raw field values, plus `Song` methods that apply them.
//! The row codec persists some of these (`compilation_effective`,
//! `effective_albumartist`, `effective_originalyear`) but never reads them back.

use super::Song;

/// Album, falling back to the title (singles are one-track albums)
pub fn effective_album<'a>(album: &'a str, title: &'a str) -> &'a str {
    if album.is_empty() {
        title
    } else {
        album
    }
}

/// Album artist, falling back to the track artist
pub fn effective_albumartist<'a>(albumartist: &'a str, artist: &'a str) -> &'a str {
    if albumartist.is_empty() {
        artist
    } else {
        albumartist
    }
}

/// Original release year, falling back to the year
pub fn effective_originalyear(originalyear: Option<i32>, year: Option<i32>) -> Option<i32> {
    match originalyear {
        Some(v) if v >= 0 => Some(v),
        _ => year,
    }
}

/// Compilation rule: any of the three "on" inputs, unless the user forced it off
pub fn is_compilation(compilation: bool, detected: bool, on: bool, off: bool) -> bool {
    (compilation || detected || on) && !off
}

impl Song {
    pub fn effective_album(&self) -> &str {
        effective_album(self.album(), self.title())
    }

    pub fn effective_albumartist(&self) -> &str {
        effective_albumartist(self.albumartist(), self.artist())
    }

    /// Album artist as shown in playlists: compilations keep the raw tag
    pub fn playlist_albumartist(&self) -> &str {
        if self.is_compilation() {
            self.albumartist()
        } else {
            self.effective_albumartist()
        }
    }

    pub fn effective_originalyear(&self) -> Option<i32> {
        effective_originalyear(self.originalyear(), self.year())
    }

    pub fn is_compilation(&self) -> bool {
        is_compilation(
            self.compilation(),
            self.compilation_detected(),
            self.compilation_on(),
            self.compilation_off(),
        )
    }
}
