//! MTP (Media Transfer Protocol) track metadata
//!
//! MTP tracks have no album artist, disc, grouping or comment fields; those
//! are lost when writing to a device.

use crate::{ensure_valid, DeviceCodec, DeviceError, DeviceFamily, DeviceTrack, Result};
use serde::{Deserialize, Serialize};
use songbase_common::song::NSEC_PER_MSEC;
use songbase_common::{FileType, Song, SongUrl};

/// Native MTP file type code
///
/// Only the audio codes below are interpreted; any other code is carried
/// through unchanged and decodes as [`FileType::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MtpFileType(pub u32);

impl MtpFileType {
    pub const WAV: Self = Self(1);
    pub const MP3: Self = Self(2);
    pub const WMA: Self = Self(3);
    pub const OGG: Self = Self(4);
    pub const MP4: Self = Self(6);
    pub const UNDEF_AUDIO: Self = Self(7);
    pub const ASF: Self = Self(11);
    pub const AAC: Self = Self(30);
    pub const FLAC: Self = Self(32);
    pub const MP2: Self = Self(33);
    pub const M4A: Self = Self(34);

    pub fn to_file_type(self) -> FileType {
        match self {
            Self::WAV => FileType::Wav,
            Self::MP3 | Self::MP2 => FileType::Mpeg,
            Self::WMA => FileType::Asf,
            Self::OGG => FileType::OggVorbis,
            Self::MP4 | Self::AAC | Self::M4A => FileType::Mp4,
            Self::FLAC => FileType::OggFlac,
            _ => FileType::Unknown,
        }
    }

    pub fn from_file_type(filetype: FileType) -> Self {
        match filetype {
            FileType::Asf => Self::ASF,
            FileType::Mp4 => Self::MP4,
            FileType::Mpeg => Self::MP3,
            FileType::Flac | FileType::OggFlac => Self::FLAC,
            FileType::OggSpeex | FileType::OggVorbis => Self::OGG,
            FileType::Wav => Self::WAV,
            _ => Self::UNDEF_AUDIO,
        }
    }
}

/// MTP track fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtpTrack {
    pub item_id: u32,
    pub parent_id: u32,
    pub storage_id: u32,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub composer: String,
    /// ISO 8601 release date, e.g. `20010312T000000`
    pub date: Option<String>,
    pub tracknumber: u16,
    pub filename: String,
    pub filesize: u64,
    pub modificationdate: i64,
    /// Milliseconds
    pub duration: u32,
    pub bitrate: u32,
    pub bitratetype: u8,
    pub samplerate: u32,
    pub nochannels: u16,
    pub wavecodec: u32,
    pub usecount: u32,
    pub filetype: MtpFileType,
}

#[derive(Debug, Clone)]
pub struct MtpCodec {
    host: String,
}

impl MtpCodec {
    /// `host` names the device in song locations (`mtp://<host>/<item id>`)
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn decode_track(&self, track: &MtpTrack) -> Song {
        let mut song = Song::new();
        song.set_valid(true);

        song.set_title(track.title.as_str());
        song.set_artist(track.artist.as_str());
        song.set_album(track.album.as_str());
        song.set_genre(track.genre.as_str());
        song.set_composer(track.composer.as_str());
        song.set_track(Some(i32::from(track.tracknumber)));

        song.set_url(SongUrl::parse(format!("mtp://{}/{}", self.host, track.item_id)));
        song.set_basefilename(track.item_id.to_string());
        song.set_filesize(i64::try_from(track.filesize).ok());
        song.set_mtime(Some(track.modificationdate));
        song.set_ctime(Some(track.modificationdate));

        song.set_length_nanosec(i64::from(track.duration) * NSEC_PER_MSEC);
        song.set_samplerate(i32::try_from(track.samplerate).ok());
        song.set_bitdepth(Some(0));
        song.set_bitrate(i32::try_from(track.bitrate).ok());

        song.set_playcount(track.usecount);
        song.set_filetype(track.filetype.to_file_type());
        song
    }

    pub fn encode_track(&self, song: &Song) -> MtpTrack {
        MtpTrack {
            item_id: 0,
            parent_id: 0,
            storage_id: 0,
            title: song.title().to_string(),
            artist: song.artist().to_string(),
            album: song.album().to_string(),
            genre: song.genre().to_string(),
            composer: song.composer().to_string(),
            date: None,
            tracknumber: song.track().and_then(|t| u16::try_from(t).ok()).unwrap_or(0),
            filename: song.basefilename().to_string(),
            filesize: song.filesize().and_then(|v| u64::try_from(v).ok()).unwrap_or(0),
            modificationdate: song.mtime().unwrap_or(0),
            duration: song
                .length_nanosec()
                .and_then(|ns| u32::try_from(ns / NSEC_PER_MSEC).ok())
                .unwrap_or(0),
            bitrate: song.bitrate().and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
            bitratetype: 0,
            samplerate: song.samplerate().and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
            nochannels: 0,
            wavecodec: 0,
            usecount: song.playcount(),
            filetype: MtpFileType::from_file_type(song.filetype()),
        }
    }
}

impl DeviceCodec for MtpCodec {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Mtp
    }

    fn decode(&self, track: &DeviceTrack) -> Result<Song> {
        match track {
            DeviceTrack::Mtp(track) => Ok(self.decode_track(track)),
            other => Err(DeviceError::WrongFamily {
                codec: DeviceFamily::Mtp,
                track: other.family(),
            }),
        }
    }

    fn encode(&self, song: &Song) -> Result<DeviceTrack> {
        ensure_valid(song)?;
        Ok(DeviceTrack::Mtp(self.encode_track(song)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songbase_common::song::NSEC_PER_SEC;

    #[test]
    fn test_decode_table() {
        let expected = [
            (MtpFileType::WAV, FileType::Wav),
            (MtpFileType::MP3, FileType::Mpeg),
            (MtpFileType::WMA, FileType::Asf),
            (MtpFileType::OGG, FileType::OggVorbis),
            (MtpFileType::MP4, FileType::Mp4),
            (MtpFileType::AAC, FileType::Mp4),
            (MtpFileType::FLAC, FileType::OggFlac),
            (MtpFileType::MP2, FileType::Mpeg),
            (MtpFileType::M4A, FileType::Mp4),
            (MtpFileType::UNDEF_AUDIO, FileType::Unknown),
            (MtpFileType::ASF, FileType::Unknown),
            (MtpFileType(9999), FileType::Unknown),
        ];
        for (native, filetype) in expected {
            assert_eq!(native.to_file_type(), filetype, "decoding {:?}", native);
        }
    }

    #[test]
    fn test_encode_table() {
        for filetype in FileType::ALL {
            let expected = match filetype {
                FileType::Asf => MtpFileType::ASF,
                FileType::Mp4 => MtpFileType::MP4,
                FileType::Mpeg => MtpFileType::MP3,
                FileType::Flac | FileType::OggFlac => MtpFileType::FLAC,
                FileType::OggSpeex | FileType::OggVorbis => MtpFileType::OGG,
                FileType::Wav => MtpFileType::WAV,
                _ => MtpFileType::UNDEF_AUDIO,
            };
            assert_eq!(MtpFileType::from_file_type(filetype), expected, "encoding {:?}", filetype);
        }
        assert_eq!(MtpFileType::from_file_type(FileType::Aiff), MtpFileType::UNDEF_AUDIO);
        assert_eq!(MtpFileType::from_file_type(FileType::OggOpus), MtpFileType::UNDEF_AUDIO);
    }

    #[test]
    fn test_decode_track() {
        let codec = MtpCodec::new("usb-002-005");
        let track = MtpTrack {
            item_id: 4242,
            title: "Teardrop".into(),
            artist: "Massive Attack".into(),
            album: "Mezzanine".into(),
            tracknumber: 3,
            filesize: 9_000_000,
            modificationdate: 1_500_000_000,
            duration: 330_000,
            bitrate: 320,
            samplerate: 44100,
            usecount: 17,
            filetype: MtpFileType::MP3,
            ..MtpTrack::default()
        };
        let song = codec.decode_track(&track);

        assert!(song.is_valid());
        assert_eq!(song.url().as_str(), "mtp://usb-002-005/4242");
        assert_eq!(song.basefilename(), "4242");
        assert_eq!(song.track(), Some(3));
        assert_eq!(song.mtime(), Some(1_500_000_000));
        assert_eq!(song.ctime(), Some(1_500_000_000));
        assert_eq!(song.length_nanosec(), Some(330 * NSEC_PER_SEC));
        assert_eq!(song.bitdepth(), Some(0));
        assert_eq!(song.playcount(), 17);
        assert_eq!(song.filetype(), FileType::Mpeg);
        assert_eq!(song.albumartist(), "");
    }

    #[test]
    fn test_encode_leaves_device_fields_neutral() {
        let codec = MtpCodec::new("usb-002-005");
        let mut song = Song::with_length("Angel", "Massive Attack", "Mezzanine", 379 * NSEC_PER_SEC);
        song.set_albumartist("Massive Attack");
        song.set_comment("lost on MTP");
        song.set_basefilename("01 Angel.flac");
        song.set_filetype(FileType::Flac);
        song.set_playcount(5);

        let track = codec.encode_track(&song);
        assert_eq!(track.item_id, 0);
        assert_eq!(track.parent_id, 0);
        assert_eq!(track.storage_id, 0);
        assert_eq!(track.date, None);
        assert_eq!(track.bitratetype, 0);
        assert_eq!(track.nochannels, 0);
        assert_eq!(track.wavecodec, 0);
        assert_eq!(track.filename, "01 Angel.flac");
        assert_eq!(track.duration, 379_000);
        assert_eq!(track.usecount, 5);
        assert_eq!(track.filetype, MtpFileType::FLAC);
    }

    #[test]
    fn test_round_trip_keeps_shared_fields() {
        let codec = MtpCodec::new("usb-1");
        let mut song = Song::with_length("Inertia Creeps", "Massive Attack", "Mezzanine", 356 * NSEC_PER_SEC);
        song.set_genre("Trip hop");
        song.set_composer("Del Naja");
        song.set_track(Some(4));
        song.set_bitrate(Some(320));
        song.set_samplerate(Some(48000));
        song.set_filetype(FileType::Mpeg);
        song.set_playcount(2);

        let decoded = codec.decode_track(&codec.encode_track(&song));
        assert_eq!(decoded.title(), song.title());
        assert_eq!(decoded.genre(), song.genre());
        assert_eq!(decoded.composer(), song.composer());
        assert_eq!(decoded.track(), Some(4));
        assert_eq!(decoded.length_nanosec(), song.length_nanosec());
        assert_eq!(decoded.samplerate(), Some(48000));
        assert_eq!(decoded.filetype(), FileType::Mpeg);
        assert_eq!(decoded.playcount(), 2);
    }
}
