//! Device codec errors

use crate::DeviceFamily;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeviceError>;

#[derive(Error, Debug)]
pub enum DeviceError {
    /// The family's runtime library was not found at startup
    #[error("{0} support is not available (runtime library not found)")]
    Unavailable(DeviceFamily),

    /// A track of one family was handed to another family's codec
    #[error("{codec} codec cannot handle a {track} track")]
    WrongFamily { codec: DeviceFamily, track: DeviceFamily },

    /// Only valid songs can be written to a device
    #[error("Cannot write invalid song '{0}' to a device")]
    InvalidSong(String),
}
