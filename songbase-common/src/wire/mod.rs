//! Tag-reader wire format
//!
//! The tag reader runs out of process; songs cross the boundary as a
//! [`SongMetadataMessage`] inside a [`TagReaderMessage`] envelope, encoded
//! as JSON.

pub mod envelope;
pub mod message;

pub use envelope::{TagReaderMessage, TagReaderPayload};
pub use message::SongMetadataMessage;

use crate::config::CodecContext;
use crate::song::Song;

impl Song {
    pub fn to_message(&self) -> SongMetadataMessage {
        SongMetadataMessage::from_song(self)
    }

    pub fn from_message(message: &SongMetadataMessage, ctx: &CodecContext) -> Song {
        message.to_song(ctx)
    }
}
