//! Song metadata as exchanged with the tag reader

use crate::config::CodecContext;
use crate::song::{FileType, Song, SongUrl};
use serde::{Deserialize, Serialize};

/// Metadata block of a tag-reader message
///
/// Integers use `-1` for "unknown". `art_automatic` and `playcount` are only
/// applied on decode when present, so a reader that cannot determine them
/// leaves the receiver's defaults alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongMetadataMessage {
    pub valid: bool,
    pub title: String,
    pub album: String,
    pub artist: String,
    pub albumartist: String,
    pub composer: String,
    pub performer: String,
    pub grouping: String,
    pub track: i32,
    pub disc: i32,
    pub year: i32,
    pub originalyear: i32,
    pub genre: String,
    pub comment: String,
    pub compilation: bool,
    pub skipcount: i32,
    pub lastplayed: i64,
    pub length_nanosec: i64,
    pub bitrate: i32,
    pub samplerate: i32,
    pub bitdepth: i32,
    /// Encoded location
    pub url: String,
    pub basefilename: String,
    pub mtime: i64,
    pub ctime: i64,
    pub filesize: i64,
    pub suspicious_tags: bool,
    /// Numeric [`FileType`] code
    pub filetype: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art_automatic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playcount: Option<i32>,
}

impl Default for SongMetadataMessage {
    fn default() -> Self {
        Self {
            valid: false,
            title: String::new(),
            album: String::new(),
            artist: String::new(),
            albumartist: String::new(),
            composer: String::new(),
            performer: String::new(),
            grouping: String::new(),
            track: -1,
            disc: -1,
            year: -1,
            originalyear: -1,
            genre: String::new(),
            comment: String::new(),
            compilation: false,
            skipcount: 0,
            lastplayed: -1,
            length_nanosec: -1,
            bitrate: -1,
            samplerate: -1,
            bitdepth: -1,
            url: String::new(),
            basefilename: String::new(),
            mtime: -1,
            ctime: -1,
            filesize: -1,
            suspicious_tags: false,
            filetype: FileType::Unknown.code(),
            art_automatic: None,
            playcount: None,
        }
    }
}

fn sentinel32(value: Option<i32>) -> i32 {
    value.unwrap_or(-1)
}

fn sentinel64(value: Option<i64>) -> i64 {
    value.unwrap_or(-1)
}

fn saturate(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl SongMetadataMessage {
    pub fn from_song(song: &Song) -> Self {
        Self {
            valid: song.is_valid(),
            title: song.title().to_string(),
            album: song.album().to_string(),
            artist: song.artist().to_string(),
            albumartist: song.albumartist().to_string(),
            composer: song.composer().to_string(),
            performer: song.performer().to_string(),
            grouping: song.grouping().to_string(),
            track: sentinel32(song.track()),
            disc: sentinel32(song.disc()),
            year: sentinel32(song.year()),
            originalyear: sentinel32(song.originalyear()),
            genre: song.genre().to_string(),
            comment: song.comment().to_string(),
            compilation: song.compilation(),
            skipcount: saturate(song.skipcount()),
            lastplayed: sentinel64(song.lastplayed()),
            length_nanosec: sentinel64(song.length_nanosec()),
            bitrate: sentinel32(song.bitrate()),
            samplerate: sentinel32(song.samplerate()),
            bitdepth: sentinel32(song.bitdepth()),
            url: song.url().as_str().to_string(),
            basefilename: song.basefilename().to_string(),
            mtime: sentinel64(song.mtime()),
            ctime: sentinel64(song.ctime()),
            filesize: sentinel64(song.filesize()),
            suspicious_tags: song.suspicious_tags(),
            filetype: song.filetype().code(),
            art_automatic: Some(song.art_automatic().to_string()),
            playcount: Some(saturate(song.playcount())),
        }
    }

    /// Build a song from the message; the result always counts as read from file
    pub fn to_song(&self, ctx: &CodecContext) -> Song {
        let mut song = Song::new();
        song.set_valid(self.valid);
        song.set_title(self.title.as_str());
        song.set_album(self.album.as_str());
        song.set_artist(self.artist.as_str());
        song.set_albumartist(self.albumartist.as_str());
        song.set_composer(self.composer.as_str());
        song.set_performer(self.performer.as_str());
        song.set_grouping(self.grouping.as_str());
        song.set_track(Some(self.track));
        song.set_disc(Some(self.disc));
        song.set_year(Some(self.year));
        song.set_originalyear(Some(self.originalyear));
        song.set_genre(self.genre.as_str());
        song.set_comment(self.comment.as_str());
        song.set_compilation(self.compilation);
        song.set_skipcount(u32::try_from(self.skipcount).unwrap_or(0));
        song.set_lastplayed(Some(self.lastplayed));
        song.set_length_nanosec(self.length_nanosec);
        song.set_bitrate(Some(self.bitrate));
        song.set_samplerate(Some(self.samplerate));
        song.set_bitdepth(Some(self.bitdepth));
        song.set_url(SongUrl::parse(self.url.as_str()));
        song.set_basefilename(self.basefilename.as_str());
        song.set_mtime(Some(self.mtime));
        song.set_ctime(Some(self.ctime));
        song.set_filesize(Some(self.filesize));
        song.set_suspicious_tags(self.suspicious_tags);
        song.set_filetype(FileType::from_code(i64::from(self.filetype)));

        if let Some(art) = &self.art_automatic {
            song.set_art_automatic(art.as_str());
        }
        if let Some(playcount) = self.playcount {
            song.set_playcount(u32::try_from(playcount).unwrap_or(0));
        }

        song.set_init_from_file(true);
        if let Some(cache) = &ctx.cover_cache_dir {
            song.init_art_manual(cache);
        }
        song
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::NSEC_PER_SEC;
    use std::path::Path;

    fn tagged_song() -> Song {
        let mut song = Song::with_length("Windowlicker", "Aphex Twin", "Windowlicker", 367 * NSEC_PER_SEC);
        song.set_url(SongUrl::from_local_file(Path::new("/music/aphex/windowlicker.flac")));
        song.set_basefilename("windowlicker.flac");
        song.set_albumartist("Aphex Twin");
        song.set_composer("Richard D. James");
        song.set_performer("Aphex Twin");
        song.set_grouping("Warp");
        song.set_track(Some(1));
        song.set_disc(Some(1));
        song.set_year(Some(1999));
        song.set_originalyear(Some(1999));
        song.set_genre("Electronic");
        song.set_comment("WAP105");
        song.set_bitrate(Some(900));
        song.set_samplerate(Some(44100));
        song.set_bitdepth(Some(16));
        song.set_mtime(Some(1_600_000_000));
        song.set_ctime(Some(1_600_000_001));
        song.set_filesize(Some(40_000_000));
        song.set_filetype(FileType::Flac);
        song.set_playcount(3);
        song.set_skipcount(2);
        song.set_lastplayed(Some(1_650_000_000));
        song.set_art_automatic("(embedded)");
        song.set_suspicious_tags(true);
        song
    }

    #[test]
    fn test_round_trip_preserves_metadata() {
        let song = tagged_song();
        let decoded = SongMetadataMessage::from_song(&song).to_song(&CodecContext::default());

        assert!(decoded.is_metadata_equal(&song));
        assert_eq!(decoded, song);
        assert!(decoded.is_valid());
        assert!(decoded.init_from_file());
        assert!(decoded.suspicious_tags());
        assert_eq!(decoded.basefilename(), "windowlicker.flac");
        assert_eq!(decoded.playcount(), 3);
        assert_eq!(decoded.skipcount(), 2);
        assert_eq!(decoded.lastplayed(), Some(1_650_000_000));
        assert_eq!(decoded.filesize(), Some(40_000_000));
        assert_eq!(decoded.filetype(), FileType::Flac);
    }

    #[test]
    fn test_unknown_values_use_sentinels() {
        let message = SongMetadataMessage::from_song(&Song::new());
        assert_eq!(message.track, -1);
        assert_eq!(message.length_nanosec, -1);
        assert_eq!(message.filesize, -1);
        assert_eq!(message.lastplayed, -1);
        assert_eq!(message.filetype, 0);
        assert_eq!(message.art_automatic.as_deref(), Some(""));
        assert_eq!(message.playcount, Some(0));

        let song = message.to_song(&CodecContext::default());
        assert_eq!(song.track(), None);
        assert_eq!(song.length_nanosec(), None);
        assert_eq!(song.filesize(), None);
        assert!(song.init_from_file());
    }

    #[test]
    fn test_absent_optional_fields_are_not_applied() {
        let message = SongMetadataMessage {
            valid: true,
            title: "x".into(),
            ..SongMetadataMessage::default()
        };
        let song = message.to_song(&CodecContext::default());
        assert_eq!(song.art_automatic(), "");
        assert_eq!(song.playcount(), 0);

        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("art_automatic").is_none());
        assert!(json.get("playcount").is_none());
    }

    #[test]
    fn test_missing_fields_decode_as_unknown() {
        let message: SongMetadataMessage =
            serde_json::from_str(r#"{"valid": true, "title": "Only a title", "year": 2001}"#).unwrap();
        assert_eq!(message.track, -1);
        assert_eq!(message.year, 2001);

        let song = message.to_song(&CodecContext::default());
        assert_eq!(song.title(), "Only a title");
        assert_eq!(song.year(), Some(2001));
        assert_eq!(song.bitrate(), None);
    }
}
