//! Source type enumeration.

use serde::{Deserialize, Serialize};

/// Kind of content a job was submitted with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Plain text pasted by the user
    #[display("text")]
    Text,
    /// Uploaded audio file (MP3, WAV, M4A, etc.)
    #[display("audio")]
    Audio,
    /// Uploaded video file (MP4, MOV, WebM, etc.)
    #[display("video")]
    Video,
}

impl SourceType {
    /// Convert to string representation for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Text => "text",
            SourceType::Audio => "audio",
            SourceType::Video => "video",
        }
    }

    /// Whether the source arrives as an uploaded file rather than inline text.
    pub fn is_media(&self) -> bool {
        matches!(self, SourceType::Audio | SourceType::Video)
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(SourceType::Text),
            "audio" => Ok(SourceType::Audio),
            "video" => Ok(SourceType::Video),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}
