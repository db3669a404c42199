use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::MessageError;

/// Requests exchanged between a page context and the history host.
///
/// Serialized with a `type` discriminator, e.g.
/// `{"type":"updateVideoTime","url":"…","title":"…","videoTime":12.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrackerMessage {
    #[serde(rename = "updateVideoTime")]
    UpdateVideoTime {
        url: String,
        #[serde(default)]
        title: String,
        #[serde(rename = "videoTime", default)]
        video_time: f64,
    },
    #[serde(rename = "getHistory")]
    GetHistory,
    #[serde(rename = "clearHistory")]
    ClearHistory,
    #[serde(rename = "exportCSV")]
    ExportCsv,
}

impl TrackerMessage {
    /// Every discriminator the host understands.
    pub const KNOWN_TYPES: [&'static str; 4] =
        ["updateVideoTime", "getHistory", "clearHistory", "exportCSV"];

    /// Decodes a raw message, separating unknown types from bad payloads.
    pub fn from_value(raw: &Value) -> Result<Self, MessageError> {
        let kind = raw
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(MessageError::UnknownType)?;
        if !Self::KNOWN_TYPES.contains(&kind) {
            return Err(MessageError::UnknownType);
        }
        serde_json::from_value(raw.clone())
            .map_err(|e| MessageError::InvalidPayload(e.to_string()))
    }

    /// Returns the wire discriminator of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerMessage::UpdateVideoTime { .. } => "updateVideoTime",
            TrackerMessage::GetHistory => "getHistory",
            TrackerMessage::ClearHistory => "clearHistory",
            TrackerMessage::ExportCsv => "exportCSV",
        }
    }
}
