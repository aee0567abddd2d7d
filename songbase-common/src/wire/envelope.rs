//! Request/response envelope for the tag reader
//!
//! Every message carries an opaque id; a response repeats the id of the
//! request it answers.

use super::message::SongMetadataMessage;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TagReaderPayload {
    ReadFile { filename: String },
    ReadFileResponse { metadata: SongMetadataMessage },
    SaveFile { filename: String, metadata: SongMetadataMessage },
    SaveFileResponse { success: bool },
    IsMediaFile { filename: String },
    IsMediaFileResponse { success: bool },
}

impl TagReaderPayload {
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            TagReaderPayload::ReadFile { .. } | TagReaderPayload::SaveFile { .. } | TagReaderPayload::IsMediaFile { .. }
        )
    }

    /// True when `self` is the response kind for `request`
    pub fn answers(&self, request: &TagReaderPayload) -> bool {
        matches!(
            (request, self),
            (TagReaderPayload::ReadFile { .. }, TagReaderPayload::ReadFileResponse { .. })
                | (TagReaderPayload::SaveFile { .. }, TagReaderPayload::SaveFileResponse { .. })
                | (TagReaderPayload::IsMediaFile { .. }, TagReaderPayload::IsMediaFileResponse { .. })
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagReaderMessage {
    pub id: u64,
    #[serde(flatten)]
    pub payload: TagReaderPayload,
}

impl TagReaderMessage {
    pub fn new(id: u64, payload: TagReaderPayload) -> Self {
        Self { id, payload }
    }

    /// Response carrying this request's id
    pub fn reply(&self, payload: TagReaderPayload) -> Self {
        Self { id: self.id, payload }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
