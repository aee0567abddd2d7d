//! Codec/container kinds
//!
//! The numeric codes are persisted in the `filetype` column and carried by the
//! tag-reader message, so they must never be renumbered.

use serde::{Deserialize, Serialize};

/// Codec or container kind of the media behind a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    #[default]
    Unknown,
    Asf,
    Flac,
    Mp4,
    Mpc,
    Mpeg,
    OggFlac,
    OggSpeex,
    OggVorbis,
    Aiff,
    Wav,
    TrueAudio,
    Cdda,
    OggOpus,
    Stream,
}

impl FileType {
    /// All kinds, in code order
    pub const ALL: [FileType; 15] = [
        FileType::Unknown,
        FileType::Asf,
        FileType::Flac,
        FileType::Mp4,
        FileType::Mpc,
        FileType::Mpeg,
        FileType::OggFlac,
        FileType::OggSpeex,
        FileType::OggVorbis,
        FileType::Aiff,
        FileType::Wav,
        FileType::TrueAudio,
        FileType::Cdda,
        FileType::OggOpus,
        FileType::Stream,
    ];

    /// Storage/wire code
    pub fn code(self) -> i32 {
        match self {
            FileType::Unknown => 0,
            FileType::Asf => 1,
            FileType::Flac => 2,
            FileType::Mp4 => 3,
            FileType::Mpc => 4,
            FileType::Mpeg => 5,
            FileType::OggFlac => 6,
            FileType::OggSpeex => 7,
            FileType::OggVorbis => 8,
            FileType::Aiff => 9,
            FileType::Wav => 10,
            FileType::TrueAudio => 11,
            FileType::Cdda => 12,
            FileType::OggOpus => 13,
            FileType::Stream => 99,
        }
    }

    /// Inverse of [`FileType::code`]; unassigned codes map to `Unknown`
    pub fn from_code(code: i64) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|t| i64::from(t.code()) == code)
            .unwrap_or(FileType::Unknown)
    }

    /// Human-readable name
    pub fn description(self) -> &'static str {
        match self {
            FileType::Asf => "Windows Media audio",
            FileType::Flac => "Flac",
            FileType::Mp4 => "MP4 AAC",
            FileType::Mpc => "MPC",
            FileType::Mpeg => "MP3",
            FileType::OggFlac => "Ogg Flac",
            FileType::OggSpeex => "Ogg Speex",
            FileType::OggVorbis => "Ogg Vorbis",
            FileType::OggOpus => "Ogg Opus",
            FileType::Aiff => "AIFF",
            FileType::Wav => "Wav",
            FileType::TrueAudio => "TrueAudio",
            FileType::Cdda => "CDDA",
            FileType::Stream => "Stream",
            FileType::Unknown => "Unknown",
        }
    }

    pub fn is_lossless(self) -> bool {
        matches!(
            self,
            FileType::Aiff | FileType::Flac | FileType::OggFlac | FileType::Wav
        )
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(FileType::Unknown.code(), 0);
        assert_eq!(FileType::Flac.code(), 2);
        assert_eq!(FileType::Mpeg.code(), 5);
        assert_eq!(FileType::OggOpus.code(), 13);
        assert_eq!(FileType::Stream.code(), 99);
    }

    #[test]
    fn test_from_code_covers_every_kind() {
        for kind in FileType::ALL {
            assert_eq!(FileType::from_code(i64::from(kind.code())), kind);
        }
    }

    #[test]
    fn test_unassigned_code_is_unknown() {
        assert_eq!(FileType::from_code(42), FileType::Unknown);
        assert_eq!(FileType::from_code(-1), FileType::Unknown);
    }

    #[test]
    fn test_lossless_kinds() {
        let lossless: Vec<_> = FileType::ALL.iter().filter(|t| t.is_lossless()).collect();
        assert_eq!(
            lossless,
            vec![&FileType::Flac, &FileType::OggFlac, &FileType::Aiff, &FileType::Wav]
        );
    }
}
