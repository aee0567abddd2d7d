//! Cover art markers and cache lookup

use super::Song;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `art_manual` value meaning the user explicitly removed the cover
pub const MANUALLY_UNSET_COVER: &str = "(unset)";
/// `art_automatic` value meaning the cover is embedded in the media file
pub const EMBEDDED_COVER: &str = "(embedded)";

/// File name of a cached cover for an artist/album pair
pub fn cover_cache_file_name(artist: &str, album: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(artist.to_lowercase().as_bytes());
    hasher.update(album.to_lowercase().as_bytes());
    format!("{:x}.jpg", hasher.finalize())
}

impl Song {
    pub fn has_manually_unset_cover(&self) -> bool {
        self.art_manual() == MANUALLY_UNSET_COVER
    }

    pub fn manually_unset_cover(&mut self) {
        self.set_art_manual(MANUALLY_UNSET_COVER);
    }

    pub fn has_embedded_cover(&self) -> bool {
        self.art_automatic() == EMBEDDED_COVER
    }

    pub fn set_embedded_cover(&mut self) {
        self.set_art_automatic(EMBEDDED_COVER);
    }

    /// Adopt a previously cached cover when the song has no cover at all
    ///
    /// Returns the adopted path.
    pub fn init_art_manual(&mut self, cover_cache_dir: &Path) -> Option<PathBuf> {
        if !self.art_manual().is_empty() || !self.art_automatic().is_empty() {
            return None;
        }
        let path = cover_cache_dir.join(cover_cache_file_name(self.artist(), self.album()));
        if !path.exists() {
            return None;
        }
        debug!("Using cached cover {} for {}", path.display(), self.pretty_title());
        self.set_art_manual(path.to_string_lossy().into_owned());
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cover_markers() {
        let mut song = Song::new();
        assert!(!song.has_manually_unset_cover());
        assert!(!song.has_embedded_cover());

        song.manually_unset_cover();
        song.set_embedded_cover();
        assert!(song.has_manually_unset_cover());
        assert!(song.has_embedded_cover());
        assert_eq!(song.art_manual(), "(unset)");
        assert_eq!(song.art_automatic(), "(embedded)");
    }

    #[test]
    fn test_cache_name_ignores_case() {
        assert_eq!(
            cover_cache_file_name("The Beatles", "Abbey Road"),
            cover_cache_file_name("the beatles", "ABBEY ROAD")
        );
        assert!(cover_cache_file_name("a", "b").ends_with(".jpg"));
    }

    #[test]
    fn test_init_art_manual_uses_existing_cache_entry() {
        let cache = TempDir::new().unwrap();
        let mut song = Song::with_length("Something", "The Beatles", "Abbey Road", 1);

        assert_eq!(song.init_art_manual(cache.path()), None);
        assert_eq!(song.art_manual(), "");

        let cached = cache.path().join(cover_cache_file_name("The Beatles", "Abbey Road"));
        std::fs::write(&cached, b"jpeg").unwrap();

        assert_eq!(song.init_art_manual(cache.path()), Some(cached.clone()));
        assert_eq!(song.art_manual(), cached.to_string_lossy());
    }

    #[test]
    fn test_init_art_manual_keeps_existing_cover() {
        let cache = TempDir::new().unwrap();
        let cached = cache.path().join(cover_cache_file_name("A", "B"));
        std::fs::write(&cached, b"jpeg").unwrap();

        let mut song = Song::with_length("T", "A", "B", 1);
        song.set_art_automatic("/music/folder.jpg");
        assert_eq!(song.init_art_manual(cache.path()), None);
        assert_eq!(song.art_manual(), "");
    }
}
