//! Filesystem-based file storage implementation.
//!
//! Uploaded files are stored in a content-addressable structure organized by
//! media type and content hash, so identical uploads are written once.

use crate::{compute_hash, content_path};
use repurpose_core::StoredFile;
use repurpose_error::{RepurposeResult, StorageError, StorageErrorKind};
use repurpose_interface::FileStore;
use std::path::{Component, Path, PathBuf};

/// Filesystem file store.
///
/// Stores files at `{base_path}/{type}/{hash[0:2]}/{hash}`. The path handed
/// back in [`StoredFile`] is relative to `base_path`.
///
/// ```text
/// /var/lib/repurpose/files/
/// ├── audio/
/// │   └── 12/
/// │       └── 123456abcdef...  (MP3 file)
/// ├── video/
/// │   └── ef/
/// │       └── ef9012abcdef...  (MP4 file)
/// └── other/
/// ```
///
/// Writes go to a uniquely named temp file and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileSystemFileStore {
    base_path: PathBuf,
}

impl FileSystemFileStore {
    /// Create a new filesystem file store.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> RepurposeResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem file store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a stored path, refusing anything that escapes the base directory.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let is_contained = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_contained {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(
                path.to_string(),
            )));
        }
        Ok(self.base_path.join(relative))
    }

    /// Verify content hash matches the file name it was stored under.
    fn verify_hash(path: &str, data: &[u8]) -> Result<(), StorageError> {
        let expected = path.rsplit('/').next().unwrap_or_default();
        let actual = compute_hash(data);
        if actual != expected {
            return Err(StorageError::new(StorageErrorKind::CorruptRecord {
                key: path.to_string(),
                reason: format!("hash mismatch: expected {}, got {}", expected, actual),
            }));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl FileStore for FileSystemFileStore {
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, bytes: &[u8], name: &str, mime_type: &str) -> RepurposeResult<StoredFile> {
        let hash = compute_hash(bytes);
        let relative = content_path(&hash, mime_type);
        let path = self.base_path.join(&relative);

        let stored = StoredFile {
            path: relative,
            size: bytes.len() as u64,
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        };

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(
                hash = %hash,
                path = %path.display(),
                "File already stored, returning existing reference"
            );
            return Ok(stored);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Unique temp name so concurrent identical uploads never share one.
        let temp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
        tokio::fs::write(&temp_path, bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            hash = %hash,
            path = %path.display(),
            size = bytes.len(),
            mime_type,
            "Stored file"
        );

        Ok(stored)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, path: &str) -> RepurposeResult<Option<Vec<u8>>> {
        let full_path = self.resolve(path)?;

        let data = match tokio::fs::read(&full_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path, "Stored file not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    full_path.display(),
                    e
                )))
                .into());
            }
        };

        Self::verify_hash(path, &data)?;

        tracing::debug!(path, size = data.len(), "Retrieved file");
        Ok(Some(data))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, path: &str) -> RepurposeResult<()> {
        let full_path = self.resolve(path)?;

        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => {
                tracing::info!(path, "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileDelete(format!(
                "{}: {}",
                full_path.display(),
                e
            )))
            .into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
