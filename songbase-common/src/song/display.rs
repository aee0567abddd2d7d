//! Presentation helpers and MPRIS metadata

use super::{Song, NSEC_PER_USEC};
use crate::human_time::pretty_time_nanosec;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;

impl Song {
    /// Title, else file name, else location
    pub fn pretty_title(&self) -> String {
        if !self.title().is_empty() {
            return self.title().to_string();
        }
        if !self.basefilename().is_empty() {
            return self.basefilename().to_string();
        }
        self.url().to_string()
    }

    pub fn pretty_title_with_artist(&self) -> String {
        let title = self.pretty_title();
        if self.artist().is_empty() {
            title
        } else {
            format!("{} - {}", self.artist(), title)
        }
    }

    pub fn pretty_length(&self) -> Option<String> {
        self.length_nanosec().map(pretty_time_nanosec)
    }

    pub fn pretty_year(&self) -> Option<String> {
        self.year().map(|y| y.to_string())
    }

    /// Title prefixed with the track artist on compilations ("Various" artists excepted)
    pub fn title_with_compilation_artist(&self) -> String {
        let title = if self.title().is_empty() {
            self.basefilename()
        } else {
            self.title()
        };

        if self.is_compilation()
            && !self.artist().is_empty()
            && !self.artist().to_lowercase().contains("various")
        {
            format!("{} - {}", self.artist(), title)
        } else {
            title.to_string()
        }
    }

    pub fn samplerate_bitdepth_text(&self) -> String {
        let samplerate = self.samplerate().unwrap_or(-1);
        match self.bitdepth() {
            Some(bitdepth) => format!("{} hz / {} bit", samplerate, bitdepth),
            None => format!("{} hz", samplerate),
        }
    }

    /// Sort case-insensitively by "artist - title"
    pub fn sort_alphabetically(songs: &mut [Song]) {
        songs.sort_by_cached_key(|s| s.pretty_title_with_artist().to_lowercase());
    }

    /// MPRIS `xesam:` metadata; unknown and empty values are omitted
    pub fn to_xesam(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();

        add_text(&mut map, "xesam:url", self.url().as_str());
        add_text(&mut map, "xesam:title", &self.pretty_title());
        add_list(&mut map, "xesam:artist", self.artist());
        add_text(&mut map, "xesam:album", self.album());
        add_list(&mut map, "xesam:albumArtist", self.albumartist());
        if let Some(length) = self.length_nanosec() {
            add_int(&mut map, "mpris:length", length / NSEC_PER_USEC);
        }
        add_int(&mut map, "xesam:trackNumber", self.track().map(i64::from).unwrap_or(-1));
        add_list(&mut map, "xesam:genre", self.genre());
        add_int(&mut map, "xesam:discNumber", self.disc().map(i64::from).unwrap_or(-1));
        add_list(&mut map, "xesam:comment", self.comment());
        if let Some(created) = self.ctime().and_then(iso8601) {
            add_text(&mut map, "xesam:contentCreated", &created);
        }
        if let Some(last_used) = self.lastplayed().and_then(iso8601) {
            add_text(&mut map, "xesam:lastUsed", &last_used);
        }
        add_list(&mut map, "xesam:composer", self.composer());
        add_int(&mut map, "xesam:useCount", i64::from(self.playcount()));

        map
    }
}

fn iso8601(unix_seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(unix_seconds, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn add_text(map: &mut BTreeMap<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_string(), json!(value));
    }
}

fn add_list(map: &mut BTreeMap<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_string(), json!([value]));
    }
}

fn add_int(map: &mut BTreeMap<String, Value>, key: &str, value: i64) {
    if value > 0 {
        map.insert(key.to_string(), json!(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{SongUrl, NSEC_PER_SEC};
    use std::path::Path;

    #[test]
    fn test_pretty_title_fallbacks() {
        let mut song = Song::from_file_partial(Path::new("/music/untitled.mp3"));
        assert_eq!(song.pretty_title(), "untitled.mp3");

        song.set_basefilename("");
        assert_eq!(song.pretty_title(), "file:///music/untitled.mp3");

        song.set_title("Titled");
        song.set_artist("Band");
        assert_eq!(song.pretty_title_with_artist(), "Band - Titled");
    }

    #[test]
    fn test_pretty_length_and_year() {
        let mut song = Song::new();
        assert_eq!(song.pretty_length(), None);
        assert_eq!(song.pretty_year(), None);

        song.set_length_nanosec(354 * NSEC_PER_SEC);
        song.set_year(Some(1975));
        assert_eq!(song.pretty_length().as_deref(), Some("5:54"));
        assert_eq!(song.pretty_year().as_deref(), Some("1975"));
    }

    #[test]
    fn test_title_with_compilation_artist() {
        let mut song = Song::new();
        song.set_title("Sail Away");
        song.set_artist("Enya");
        assert_eq!(song.title_with_compilation_artist(), "Sail Away");

        song.set_compilation_detected(true);
        assert_eq!(song.title_with_compilation_artist(), "Enya - Sail Away");

        song.set_artist("Various Artists");
        assert_eq!(song.title_with_compilation_artist(), "Sail Away");
    }

    #[test]
    fn test_samplerate_bitdepth_text() {
        let mut song = Song::new();
        song.set_samplerate(Some(44100));
        assert_eq!(song.samplerate_bitdepth_text(), "44100 hz");
        song.set_bitdepth(Some(16));
        assert_eq!(song.samplerate_bitdepth_text(), "44100 hz / 16 bit");
    }

    #[test]
    fn test_sort_alphabetically_ignores_case() {
        let mut songs = vec![
            Song::with_length("b", "zed", "", 1),
            Song::with_length("A", "alpha", "", 1),
            Song::with_length("c", "Alpha", "", 1),
        ];
        Song::sort_alphabetically(&mut songs);
        let titles: Vec<_> = songs.iter().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, vec!["A", "c", "b"]);
    }

    #[test]
    fn test_xesam_metadata() {
        let mut song = Song::with_length("Imagine", "John Lennon", "Imagine", 183 * NSEC_PER_SEC);
        song.set_url(SongUrl::parse("file:///music/imagine.flac"));
        song.set_track(Some(1));
        song.set_playcount(7);
        song.set_ctime(Some(0));

        let map = song.to_xesam();
        assert_eq!(map["xesam:title"], json!("Imagine"));
        assert_eq!(map["xesam:artist"], json!(["John Lennon"]));
        assert_eq!(map["mpris:length"], json!(183_000_000));
        assert_eq!(map["xesam:trackNumber"], json!(1));
        assert_eq!(map["xesam:useCount"], json!(7));
        assert_eq!(map["xesam:contentCreated"], json!("1970-01-01T00:00:00"));
        assert!(!map.contains_key("xesam:discNumber"));
        assert!(!map.contains_key("xesam:genre"));
        assert!(!map.contains_key("xesam:lastUsed"));
    }
}
