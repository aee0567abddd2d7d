//! # Songbase Devices
//!
//! Track conversions for portable music players. Each device family has its
//! own native track structure and a [`DeviceCodec`] translating it to and
//! from [`Song`]. Families are optional at runtime: [`registry::DeviceCodecs`]
//! probes for each family's runtime library on startup and only hands out
//! codecs for families that are present.

pub mod error;
pub mod ipod;
pub mod mtp;
pub mod registry;

pub use error::{DeviceError, Result};
pub use ipod::{IpodCodec, IpodTrack};
pub use mtp::{MtpCodec, MtpFileType, MtpTrack};
pub use registry::{DeviceCodecs, DeviceTarget};

use serde::{Deserialize, Serialize};
use songbase_common::Song;

/// Supported portable device families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFamily {
    Ipod,
    Mtp,
}

impl DeviceFamily {
    pub const ALL: [DeviceFamily; 2] = [DeviceFamily::Ipod, DeviceFamily::Mtp];

    /// File name prefix of the family's runtime shared library
    pub fn library_stem(self) -> &'static str {
        match self {
            DeviceFamily::Ipod => "libgpod",
            DeviceFamily::Mtp => "libmtp",
        }
    }
}

impl std::fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceFamily::Ipod => f.write_str("iPod"),
            DeviceFamily::Mtp => f.write_str("MTP"),
        }
    }
}

/// A native track of any supported family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum DeviceTrack {
    Ipod(IpodTrack),
    Mtp(MtpTrack),
}

impl DeviceTrack {
    pub fn family(&self) -> DeviceFamily {
        match self {
            DeviceTrack::Ipod(_) => DeviceFamily::Ipod,
            DeviceTrack::Mtp(_) => DeviceFamily::Mtp,
        }
    }
}

/// Paired conversion between [`Song`] and one family's native track
///
/// Codecs are stateless apart from their connection parameters (mount
/// prefix, host name) and may be shared between threads.
pub trait DeviceCodec: Send + Sync {
    fn family(&self) -> DeviceFamily;

    /// Build a song from a native track of this codec's family
    fn decode(&self, track: &DeviceTrack) -> Result<Song>;

    /// Build a native track from a valid song
    fn encode(&self, song: &Song) -> Result<DeviceTrack>;
}

fn ensure_valid(song: &Song) -> Result<()> {
    if song.is_valid() {
        Ok(())
    } else {
        Err(DeviceError::InvalidSong(song.pretty_title()))
    }
}
