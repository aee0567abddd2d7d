//! Canonical song record
//!
//! `Song` is the format-agnostic metadata value every codec reads from and
//! writes to. It is plain data with value semantics: cloning copies every
//! field, and mutation through one copy is never visible through another.
//!
//! # Unknown values
//!
//! Integer fields that may be unknown are `Option`s in memory. The `-1`/NULL
//! sentinels used by persisted rows and tag-reader messages exist only inside
//! the codecs ([`crate::db::row_codec`], [`crate::wire`]). Text fields use the
//! empty string for "unknown".
//!
//! # Identity
//!
//! Two songs are `==` when they share `(url, beginning)`; see [`equality`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub mod art;
pub mod derived;
pub mod display;
pub mod equality;
pub mod filetype;
pub mod merge;
pub mod url;

pub use equality::{AlbumKey, SimilarityKey, SongIdentity};
pub use filetype::FileType;
pub use merge::EngineMetadata;
pub use url::SongUrl;

pub const NSEC_PER_USEC: i64 = 1_000;
pub const NSEC_PER_MSEC: i64 = 1_000_000;
pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// Extensions the filename probe accepts as music files
const PROBE_EXTENSIONS: &[&str] = &[
    "mp3", "ogg", "flac", "mpc", "m4a", "aac", "wma", "mp4", "spx", "wav", "opus", "m4b",
];

/// Song metadata record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Song {
    valid: bool,
    id: Option<i64>,

    title: String,
    album: String,
    artist: String,
    albumartist: String,
    track: Option<i32>,
    disc: Option<i32>,
    year: Option<i32>,
    originalyear: Option<i32>,
    genre: String,
    /// Declared by the file's tags
    compilation: bool,
    composer: String,
    performer: String,
    grouping: String,
    comment: String,

    /// Nanoseconds into the media, never negative
    beginning: i64,
    /// Nanoseconds into the media; `None` when the length is unknown
    end: Option<i64>,

    bitrate: Option<i32>,
    samplerate: Option<i32>,
    bitdepth: Option<i32>,

    directory_id: Option<i64>,
    url: SongUrl,
    basefilename: String,
    filetype: FileType,
    filesize: Option<i64>,
    mtime: Option<i64>,
    ctime: Option<i64>,
    unavailable: bool,

    playcount: u32,
    skipcount: u32,
    lastplayed: Option<i64>,

    /// Guessed by the library scanner
    compilation_detected: bool,
    /// User overrides
    compilation_on: bool,
    compilation_off: bool,

    /// Cover found next to the media (or the embedded-cover marker)
    art_automatic: String,
    /// Cover chosen by the user (or the unset marker); takes priority
    art_manual: String,

    cue_path: String,

    /// Metadata came from a tag reader rather than the playback engine
    init_from_file: bool,
    /// The tag reader suspects the tags use the wrong text encoding
    suspicious_tags: bool,
}

// Negative values are the persisted "unknown" marker
fn known<T: PartialOrd + Default>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v >= T::default())
}

impl Song {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimal valid song with a length
    pub fn with_length(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        length_nanosec: i64,
    ) -> Self {
        let mut song = Self {
            valid: true,
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            ..Self::default()
        };
        song.set_length_nanosec(length_nanosec);
        song
    }

    /// Minimal valid song spanning `beginning..end` of its media
    pub fn with_bounds(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        beginning_nanosec: i64,
        end_nanosec: Option<i64>,
    ) -> Self {
        let mut song = Self {
            valid: true,
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            ..Self::default()
        };
        song.set_beginning_nanosec(beginning_nanosec);
        song.set_end_nanosec(end_nanosec);
        song
    }

    /// Filename-only probe
    ///
    /// Sets the location and display name. The song is valid only when the
    /// extension names a supported music format; an unsupported extension
    /// yields an invalid song, not an error.
    pub fn from_file_partial(path: &Path) -> Self {
        let mut song = Self::new();
        song.set_url(SongUrl::from_local_file(path));
        song.basefilename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        song.valid = PROBE_EXTENSIONS.contains(&suffix.as_str());
        song
    }

    // Accessors

    pub fn is_valid(&self) -> bool {
        self.valid
    }
    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }
    pub fn id(&self) -> Option<i64> {
        self.id
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn album(&self) -> &str {
        &self.album
    }
    pub fn artist(&self) -> &str {
        &self.artist
    }
    pub fn albumartist(&self) -> &str {
        &self.albumartist
    }
    pub fn composer(&self) -> &str {
        &self.composer
    }
    pub fn performer(&self) -> &str {
        &self.performer
    }
    pub fn grouping(&self) -> &str {
        &self.grouping
    }
    pub fn track(&self) -> Option<i32> {
        self.track
    }
    pub fn disc(&self) -> Option<i32> {
        self.disc
    }
    pub fn year(&self) -> Option<i32> {
        self.year
    }
    pub fn originalyear(&self) -> Option<i32> {
        self.originalyear
    }
    pub fn genre(&self) -> &str {
        &self.genre
    }
    pub fn comment(&self) -> &str {
        &self.comment
    }
    pub fn compilation(&self) -> bool {
        self.compilation
    }
    pub fn compilation_detected(&self) -> bool {
        self.compilation_detected
    }
    pub fn compilation_on(&self) -> bool {
        self.compilation_on
    }
    pub fn compilation_off(&self) -> bool {
        self.compilation_off
    }
    pub fn playcount(&self) -> u32 {
        self.playcount
    }
    pub fn skipcount(&self) -> u32 {
        self.skipcount
    }
    pub fn lastplayed(&self) -> Option<i64> {
        self.lastplayed
    }
    pub fn cue_path(&self) -> &str {
        &self.cue_path
    }
    pub fn has_cue(&self) -> bool {
        !self.cue_path.is_empty()
    }
    pub fn beginning_nanosec(&self) -> i64 {
        self.beginning
    }
    pub fn end_nanosec(&self) -> Option<i64> {
        self.end
    }
    /// `end - beginning`, unknown when the end is unknown
    pub fn length_nanosec(&self) -> Option<i64> {
        self.end.map(|end| end - self.beginning)
    }
    pub fn bitrate(&self) -> Option<i32> {
        self.bitrate
    }
    pub fn samplerate(&self) -> Option<i32> {
        self.samplerate
    }
    pub fn bitdepth(&self) -> Option<i32> {
        self.bitdepth
    }
    pub fn directory_id(&self) -> Option<i64> {
        self.directory_id
    }
    pub fn url(&self) -> &SongUrl {
        &self.url
    }
    pub fn basefilename(&self) -> &str {
        &self.basefilename
    }
    pub fn filetype(&self) -> FileType {
        self.filetype
    }
    pub fn filesize(&self) -> Option<i64> {
        self.filesize
    }
    pub fn mtime(&self) -> Option<i64> {
        self.mtime
    }
    pub fn ctime(&self) -> Option<i64> {
        self.ctime
    }
    pub fn art_automatic(&self) -> &str {
        &self.art_automatic
    }
    pub fn art_manual(&self) -> &str {
        &self.art_manual
    }
    pub fn init_from_file(&self) -> bool {
        self.init_from_file
    }
    pub fn suspicious_tags(&self) -> bool {
        self.suspicious_tags
    }

    pub fn is_cdda(&self) -> bool {
        self.filetype == FileType::Cdda
    }

    /// Persisted in the library (has an id) and not an audio CD track
    pub fn is_collection_song(&self) -> bool {
        !self.is_cdda() && self.id.is_some()
    }

    /// Tags can be written back to the media
    pub fn is_editable(&self) -> bool {
        self.valid && !self.url.is_empty() && self.filetype != FileType::Unknown && !self.has_cue()
    }

    // Mutators

    pub fn set_valid(&mut self, v: bool) {
        self.valid = v;
    }
    pub fn set_id(&mut self, v: Option<i64>) {
        self.id = known(v);
    }
    pub fn set_title(&mut self, v: impl Into<String>) {
        self.title = v.into();
    }
    pub fn set_album(&mut self, v: impl Into<String>) {
        self.album = v.into();
    }
    pub fn set_artist(&mut self, v: impl Into<String>) {
        self.artist = v.into();
    }
    pub fn set_albumartist(&mut self, v: impl Into<String>) {
        self.albumartist = v.into();
    }
    pub fn set_composer(&mut self, v: impl Into<String>) {
        self.composer = v.into();
    }
    pub fn set_performer(&mut self, v: impl Into<String>) {
        self.performer = v.into();
    }
    pub fn set_grouping(&mut self, v: impl Into<String>) {
        self.grouping = v.into();
    }
    pub fn set_track(&mut self, v: Option<i32>) {
        self.track = known(v);
    }
    pub fn set_disc(&mut self, v: Option<i32>) {
        self.disc = known(v);
    }
    pub fn set_year(&mut self, v: Option<i32>) {
        self.year = known(v);
    }
    pub fn set_originalyear(&mut self, v: Option<i32>) {
        self.originalyear = known(v);
    }
    pub fn set_genre(&mut self, v: impl Into<String>) {
        self.genre = v.into();
    }
    pub fn set_comment(&mut self, v: impl Into<String>) {
        self.comment = v.into();
    }
    pub fn set_compilation(&mut self, v: bool) {
        self.compilation = v;
    }
    pub fn set_compilation_detected(&mut self, v: bool) {
        self.compilation_detected = v;
    }
    pub fn set_compilation_on(&mut self, v: bool) {
        self.compilation_on = v;
    }
    pub fn set_compilation_off(&mut self, v: bool) {
        self.compilation_off = v;
    }

    /// Clamps to zero; a known end is kept at or after the new beginning
    pub fn set_beginning_nanosec(&mut self, v: i64) {
        self.beginning = v.max(0);
        if let Some(end) = self.end {
            self.end = Some(end.max(self.beginning));
        }
    }

    /// Sets the end directly, independent of any previous length.
    /// Negative values mean unknown; known values are kept at or after the beginning.
    pub fn set_end_nanosec(&mut self, v: Option<i64>) {
        self.end = known(v).map(|end| end.max(self.beginning));
    }

    /// Sets `end = beginning + length`; a negative length makes the end unknown
    pub fn set_length_nanosec(&mut self, v: i64) {
        if v < 0 {
            self.end = None;
            return;
        }
        self.end = self.beginning.checked_add(v);
        if self.end.is_none() {
            debug!("Length {} ns from beginning {} ns overflows, end left unknown", v, self.beginning);
        }
    }

    pub fn set_bitrate(&mut self, v: Option<i32>) {
        self.bitrate = known(v);
    }
    pub fn set_samplerate(&mut self, v: Option<i32>) {
        self.samplerate = known(v);
    }
    pub fn set_bitdepth(&mut self, v: Option<i32>) {
        self.bitdepth = known(v);
    }
    pub fn set_directory_id(&mut self, v: Option<i64>) {
        self.directory_id = known(v);
    }
    pub fn set_url(&mut self, v: SongUrl) {
        self.url = v;
    }
    pub fn set_basefilename(&mut self, v: impl Into<String>) {
        self.basefilename = v.into();
    }
    pub fn set_filetype(&mut self, v: FileType) {
        self.filetype = v;
    }
    pub fn set_filesize(&mut self, v: Option<i64>) {
        self.filesize = known(v);
    }
    pub fn set_mtime(&mut self, v: Option<i64>) {
        self.mtime = known(v);
    }
    pub fn set_ctime(&mut self, v: Option<i64>) {
        self.ctime = known(v);
    }
    pub fn set_unavailable(&mut self, v: bool) {
        self.unavailable = v;
    }
    pub fn set_playcount(&mut self, v: u32) {
        self.playcount = v;
    }
    pub fn set_skipcount(&mut self, v: u32) {
        self.skipcount = v;
    }
    pub fn set_lastplayed(&mut self, v: Option<i64>) {
        self.lastplayed = known(v);
    }
    pub fn set_art_automatic(&mut self, v: impl Into<String>) {
        self.art_automatic = v.into();
    }
    pub fn set_art_manual(&mut self, v: impl Into<String>) {
        self.art_manual = v.into();
    }
    pub fn set_cue_path(&mut self, v: impl Into<String>) {
        self.cue_path = v.into();
    }
    pub fn set_init_from_file(&mut self, v: bool) {
        self.init_from_file = v;
    }
    pub fn set_suspicious_tags(&mut self, v: bool) {
        self.suspicious_tags = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn end_invariant_holds(song: &Song) -> bool {
        match song.end_nanosec() {
            None => true,
            Some(end) => end >= song.beginning_nanosec(),
        }
    }

    #[test]
    fn test_new_song_is_invalid_and_unknown() {
        let song = Song::new();
        assert!(!song.is_valid());
        assert_eq!(song.id(), None);
        assert_eq!(song.track(), None);
        assert_eq!(song.beginning_nanosec(), 0);
        assert_eq!(song.end_nanosec(), None);
        assert_eq!(song.length_nanosec(), None);
        assert_eq!(song.filetype(), FileType::Unknown);
        assert_eq!(song.playcount(), 0);
        assert_eq!(song.lastplayed(), None);
        assert!(!song.init_from_file());
    }

    #[test]
    fn test_beginning_clamps_to_zero() {
        let mut song = Song::new();
        song.set_beginning_nanosec(-5);
        assert_eq!(song.beginning_nanosec(), 0);
    }

    #[test]
    fn test_length_recomputes_end() {
        let mut song = Song::new();
        song.set_beginning_nanosec(10 * NSEC_PER_SEC);
        song.set_length_nanosec(200 * NSEC_PER_SEC);
        assert_eq!(song.end_nanosec(), Some(210 * NSEC_PER_SEC));
        assert_eq!(song.length_nanosec(), Some(200 * NSEC_PER_SEC));
    }

    #[test]
    fn test_negative_length_means_unknown_end() {
        let mut song = Song::with_length("t", "a", "b", 3 * NSEC_PER_SEC);
        song.set_length_nanosec(-1);
        assert_eq!(song.end_nanosec(), None);
        assert_eq!(song.length_nanosec(), None);
    }

    #[test]
    fn test_length_past_end_of_range_is_unknown() {
        let mut song = Song::new();
        song.set_beginning_nanosec(i64::MAX - 10);
        song.set_length_nanosec(100);
        assert_eq!(song.end_nanosec(), None);

        song.set_length_nanosec(10);
        assert_eq!(song.end_nanosec(), Some(i64::MAX));
    }

    #[test]
    fn test_set_end_is_independent_of_length() {
        let mut song = Song::with_length("t", "a", "b", 3 * NSEC_PER_SEC);
        song.set_end_nanosec(Some(7 * NSEC_PER_SEC));
        assert_eq!(song.length_nanosec(), Some(7 * NSEC_PER_SEC));
        song.set_end_nanosec(Some(-1));
        assert_eq!(song.end_nanosec(), None);
    }

    #[test]
    fn test_end_invariant_under_mutation_sequences() {
        let mut song = Song::new();
        assert!(end_invariant_holds(&song));

        song.set_end_nanosec(Some(100));
        song.set_beginning_nanosec(500);
        assert!(end_invariant_holds(&song));
        assert_eq!(song.end_nanosec(), Some(500));

        song.set_end_nanosec(Some(200));
        assert!(end_invariant_holds(&song));

        song.set_length_nanosec(0);
        assert!(end_invariant_holds(&song));

        let bounded = Song::with_bounds("t", "a", "b", 1_000, Some(10));
        assert!(end_invariant_holds(&bounded));
    }

    #[test]
    fn test_with_bounds_is_valid() {
        let song = Song::with_bounds("Side A", "Artist", "Album", 5 * NSEC_PER_SEC, Some(65 * NSEC_PER_SEC));
        assert!(song.is_valid());
        assert_eq!(song.title(), "Side A");
        assert_eq!(song.length_nanosec(), Some(60 * NSEC_PER_SEC));
    }

    #[test]
    fn test_negative_integers_normalize_to_unknown() {
        let mut song = Song::new();
        song.set_track(Some(-1));
        song.set_year(Some(1969));
        song.set_filesize(Some(-1));
        assert_eq!(song.track(), None);
        assert_eq!(song.year(), Some(1969));
        assert_eq!(song.filesize(), None);
    }

    #[test]
    fn test_probe_accepts_music_extensions() {
        let song = Song::from_file_partial(&PathBuf::from("/music/Queen/Bohemian Rhapsody.FLAC"));
        assert!(song.is_valid());
        assert_eq!(song.basefilename(), "Bohemian Rhapsody.FLAC");
        assert!(song.url().is_local_file());
    }

    #[test]
    fn test_probe_rejects_unsupported_extension() {
        let song = Song::from_file_partial(&PathBuf::from("/music/cover.jpg"));
        assert!(!song.is_valid());
        assert_eq!(song.basefilename(), "cover.jpg");

        let no_ext = Song::from_file_partial(&PathBuf::from("/music/README"));
        assert!(!no_ext.is_valid());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Song::with_length("Imagine", "John Lennon", "Imagine", NSEC_PER_SEC);
        let mut copy = original.clone();
        copy.set_title("Jealous Guy");
        copy.set_playcount(3);
        assert_eq!(original.title(), "Imagine");
        assert_eq!(original.playcount(), 0);
    }

    #[test]
    fn test_editable_requires_known_type_and_no_cue() {
        let mut song = Song::from_file_partial(&PathBuf::from("/music/a.flac"));
        assert!(!song.is_editable());
        song.set_filetype(FileType::Flac);
        assert!(song.is_editable());
        song.set_cue_path("/music/a.cue");
        assert!(!song.is_editable());
    }

    #[test]
    fn test_collection_song_needs_id_and_not_cdda() {
        let mut song = Song::new();
        assert!(!song.is_collection_song());
        song.set_id(Some(12));
        assert!(song.is_collection_song());
        song.set_filetype(FileType::Cdda);
        assert!(!song.is_collection_song());
    }
}
