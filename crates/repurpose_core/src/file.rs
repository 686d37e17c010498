//! Stored file references.

use serde::{Deserialize, Serialize};

/// Reference to an uploaded file persisted in a file store.
///
/// Only this reference is ever persisted with a request; the raw bytes live
/// in the file store alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Backend-specific path/key to the file
    pub path: String,
    /// Size of the stored bytes
    pub size: u64,
    /// Original filename
    pub name: String,
    /// MIME type (e.g., "audio/mpeg", "video/mp4")
    pub mime_type: String,
}

/// An uploaded file still held in memory.
///
/// Exists only between request intake and the file store write.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// Raw file bytes
    pub bytes: Vec<u8>,
    /// Original filename
    pub name: String,
    /// MIME type reported by the client
    pub mime_type: String,
}

impl Upload {
    /// Create an upload from raw parts.
    pub fn new(bytes: Vec<u8>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }
}

// Keep multi-megabyte buffers out of logs.
impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}
