//! iPod track database entries
//!
//! Paths inside the iTunesDB are stored relative to the mount point with
//! `:` as the separator (`:iPod_Control:Music:F00:ABCD.mp3`).

use crate::{ensure_valid, DeviceCodec, DeviceError, DeviceFamily, DeviceTrack, Result};
use serde::{Deserialize, Serialize};
use songbase_common::song::NSEC_PER_MSEC;
use songbase_common::{FileType, Song, SongUrl};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Media type flag for audio tracks
pub const MEDIATYPE_AUDIO: u32 = 1;

/// iTunesDB track fields used by the player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpodTrack {
    pub title: String,
    pub album: String,
    pub artist: String,
    pub albumartist: String,
    pub track_nr: i32,
    pub cd_nr: i32,
    pub year: i32,
    pub genre: String,
    pub compilation: bool,
    pub composer: String,
    pub grouping: String,
    pub comment: String,
    /// Milliseconds
    pub tracklen: i32,
    pub bitrate: i32,
    pub samplerate: u32,
    pub type1: u8,
    /// Non-zero for MPEG audio, zero for AAC/MP4
    pub type2: u8,
    pub mediatype: u32,
    pub size: u64,
    pub time_modified: i64,
    pub time_added: i64,
    pub playcount: u32,
    pub skipcount: u32,
    pub time_played: i64,
    pub ipod_path: String,
}

/// Where the iPod's files are reachable from this machine
#[derive(Debug, Clone, PartialEq, Eq)]
enum MountPrefix {
    /// Mounted filesystem
    Local(PathBuf),
    /// Remote location, e.g. `afc://<udid>`
    Url(String),
}

impl MountPrefix {
    fn parse(prefix: &str) -> Self {
        if prefix.contains("://") {
            MountPrefix::Url(prefix.trim_end_matches('/').to_string())
        } else {
            MountPrefix::Local(PathBuf::from(prefix))
        }
    }
}

#[derive(Debug, Clone)]
pub struct IpodCodec {
    prefix: MountPrefix,
}

impl IpodCodec {
    /// `prefix` is a mount directory, or a URL prefix when it contains `://`
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: MountPrefix::parse(prefix),
        }
    }

    pub fn decode_track(&self, track: &IpodTrack) -> Song {
        let mut song = Song::new();
        song.set_valid(true);

        song.set_title(track.title.as_str());
        song.set_album(track.album.as_str());
        song.set_artist(track.artist.as_str());
        song.set_albumartist(track.albumartist.as_str());
        song.set_track(Some(track.track_nr));
        song.set_disc(Some(track.cd_nr));
        song.set_year(Some(track.year));
        song.set_genre(track.genre.as_str());
        song.set_compilation(track.compilation);
        song.set_composer(track.composer.as_str());
        song.set_grouping(track.grouping.as_str());
        song.set_comment(track.comment.as_str());

        song.set_length_nanosec(i64::from(track.tracklen) * NSEC_PER_MSEC);
        song.set_bitrate(Some(track.bitrate));
        song.set_samplerate(i32::try_from(track.samplerate).ok());
        song.set_bitdepth(None);

        let path = track.ipod_path.replace(':', "/");
        let url = match &self.prefix {
            MountPrefix::Url(prefix) => SongUrl::with_path(prefix, &path),
            MountPrefix::Local(dir) => SongUrl::from_local_file(&dir.join(path.trim_start_matches('/'))),
        };
        song.set_url(url);
        song.set_basefilename(
            Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        song.set_filetype(if track.type2 != 0 { FileType::Mpeg } else { FileType::Mp4 });
        song.set_filesize(i64::try_from(track.size).ok());
        song.set_mtime(Some(track.time_modified));
        song.set_ctime(Some(track.time_added));

        song.set_playcount(track.playcount);
        song.set_skipcount(track.skipcount);
        song.set_lastplayed(Some(track.time_played));
        song
    }

    pub fn encode_track(&self, song: &Song) -> IpodTrack {
        IpodTrack {
            title: song.title().to_string(),
            album: song.album().to_string(),
            artist: song.artist().to_string(),
            albumartist: song.albumartist().to_string(),
            track_nr: song.track().unwrap_or(0),
            cd_nr: song.disc().unwrap_or(0),
            year: song.year().unwrap_or(0),
            genre: song.genre().to_string(),
            compilation: song.compilation(),
            composer: song.composer().to_string(),
            grouping: song.grouping().to_string(),
            comment: song.comment().to_string(),
            tracklen: song
                .length_nanosec()
                .and_then(|ns| i32::try_from(ns / NSEC_PER_MSEC).ok())
                .unwrap_or(0),
            bitrate: song.bitrate().unwrap_or(0),
            samplerate: song.samplerate().and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
            type1: 0,
            type2: if song.filetype() == FileType::Mp4 { 0 } else { 1 },
            mediatype: MEDIATYPE_AUDIO,
            size: song.filesize().and_then(|v| u64::try_from(v).ok()).unwrap_or(0),
            time_modified: song.mtime().unwrap_or(0),
            time_added: song.ctime().unwrap_or(0),
            playcount: song.playcount(),
            skipcount: song.skipcount(),
            time_played: song.lastplayed().unwrap_or(0),
            ipod_path: self.ipod_path(song.url()).unwrap_or_default(),
        }
    }

    /// `:`-separated path of `url` below the mount prefix
    fn ipod_path(&self, url: &SongUrl) -> Option<String> {
        match self.relative_path(url) {
            Some(relative) if relative.len() > 1 => Some(relative.replace('/', ":")),
            _ => {
                debug!("{} is not below the iPod mount, leaving its path unset", url);
                None
            }
        }
    }

    fn relative_path(&self, url: &SongUrl) -> Option<String> {
        match &self.prefix {
            MountPrefix::Local(dir) => {
                let path = url.to_local_file()?;
                let relative = path.strip_prefix(dir).ok()?;
                Some(format!("/{}", relative.to_string_lossy().replace('\\', "/")))
            }
            MountPrefix::Url(prefix) => {
                let rest = url.as_str().strip_prefix(prefix.as_str())?;
                // file_name() percent-decodes a single segment
                let segments: Vec<String> = rest
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(|s| SongUrl::parse(s).file_name())
                    .collect();
                Some(format!("/{}", segments.join("/")))
            }
        }
    }
}

impl DeviceCodec for IpodCodec {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Ipod
    }

    fn decode(&self, track: &DeviceTrack) -> Result<Song> {
        match track {
            DeviceTrack::Ipod(track) => Ok(self.decode_track(track)),
            other => Err(DeviceError::WrongFamily {
                codec: DeviceFamily::Ipod,
                track: other.family(),
            }),
        }
    }

    fn encode(&self, song: &Song) -> Result<DeviceTrack> {
        ensure_valid(song)?;
        Ok(DeviceTrack::Ipod(self.encode_track(song)))
    }
}
