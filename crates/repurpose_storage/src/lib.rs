//! Storage backends for the repurpose content pipeline.
//!
//! Two kinds of storage sit behind the pipeline:
//!
//! - **Files**: uploaded audio/video, stored content-addressed by SHA-256 so
//!   identical uploads share one blob ([`FileSystemFileStore`],
//!   [`InMemoryFileStore`]).
//! - **Records**: jobs, process requests, results and history, stored one
//!   record per key ([`JsonRecordStore`], [`InMemoryRecordStore`]).
//!
//! # Example
//!
//! ```rust
//! use repurpose_interface::FileStore;
//! use repurpose_storage::FileSystemFileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemFileStore::new("/tmp/repurpose-files")?;
//! let stored = store.put(b"ID3...", "episode.mp3", "audio/mpeg").await?;
//! assert!(stored.path.starts_with("audio/"));
//!
//! let bytes = store.get(&stored.path).await?;
//! assert_eq!(bytes.as_deref(), Some(&b"ID3..."[..]));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod json;
mod memory;

pub use filesystem::FileSystemFileStore;
pub use json::JsonRecordStore;
pub use memory::{InMemoryFileStore, InMemoryRecordStore};
pub use repurpose_error::{StorageError, StorageErrorKind};

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of data as lowercase hex.
pub(crate) fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Relative, content-addressed location for a blob.
///
/// Structure: `{audio|video|other}/{hash[0:2]}/{hash}`
pub(crate) fn content_path(hash: &str, mime_type: &str) -> String {
    let type_dir = match mime_type.split('/').next() {
        Some("audio") => "audio",
        Some("video") => "video",
        _ => "other",
    };
    format!("{}/{}/{}", type_dir, &hash[0..2], hash)
}
