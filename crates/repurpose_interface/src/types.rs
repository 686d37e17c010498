//! Request and payload types passed to collaborators.

use repurpose_core::{ContentProfile, Platform, SourceType, StoredFile};

/// The resolved source handed to the content generator.
#[derive(Clone, PartialEq)]
pub enum ContentSource {
    /// Inline text
    Text(String),
    /// Media fetched back from the file store
    Media {
        /// Raw file bytes
        bytes: Vec<u8>,
        /// Where the bytes are stored
        file: StoredFile,
        /// Audio or video
        source_type: SourceType,
    },
}

impl ContentSource {
    /// Kind of source.
    pub fn source_type(&self) -> SourceType {
        match self {
            ContentSource::Text(_) => SourceType::Text,
            ContentSource::Media { source_type, .. } => *source_type,
        }
    }

    /// Inline text, for text sources.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentSource::Text(text) => Some(text.as_str()),
            ContentSource::Media { .. } => None,
        }
    }

    /// Stored file, for media sources.
    pub fn file(&self) -> Option<&StoredFile> {
        match self {
            ContentSource::Text(_) => None,
            ContentSource::Media { file, .. } => Some(file),
        }
    }
}

impl std::fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentSource::Text(text) => f
                .debug_tuple("Text")
                .field(&format_args!("<{} chars>", text.chars().count()))
                .finish(),
            ContentSource::Media {
                bytes,
                file,
                source_type,
            } => f
                .debug_struct("Media")
                .field("bytes", &format_args!("<{} bytes>", bytes.len()))
                .field("file", file)
                .field("source_type", source_type)
                .finish(),
        }
    }
}

/// Everything a generator needs for one target.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Shared source for the whole job
    pub source: &'a ContentSource,
    /// Target identifier as requested
    pub target: &'a str,
    /// Canonical platform, when the target is recognized
    pub platform: Option<Platform>,
    /// Audience and voice hints
    pub profile: &'a ContentProfile,
    /// Final prompt; `None` for unrecognized targets
    pub prompt: Option<&'a str>,
}

/// Output of a [`VideoTranscoder`](crate::VideoTranscoder).
#[derive(Clone, PartialEq, Eq)]
pub struct TranscodedMedia {
    /// Transcoded (or original) bytes
    pub bytes: Vec<u8>,
    /// Filename for the stored bytes
    pub name: String,
    /// MIME type of the stored bytes
    pub mime_type: String,
    /// Whether the bytes differ from the input
    pub converted: bool,
}

impl std::fmt::Debug for TranscodedMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscodedMedia")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("converted", &self.converted)
            .finish()
    }
}
