//! JSON file-per-record storage.

use repurpose_error::{JsonError, RepurposeResult, StorageError, StorageErrorKind};
use repurpose_interface::{Record, RecordStore};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Record store keeping one pretty-printed JSON file per key.
///
/// Records live at `{dir}/{key}.json`. Saves write a temp file and rename it
/// into place, so readers never observe a half-written record. Keys must be
/// plain file names.
#[derive(Debug)]
pub struct JsonRecordStore<T> {
    dir: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonRecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            dir: self.dir.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> JsonRecordStore<T> {
    /// Creates a record store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> RepurposeResult<Self> {
        let dir = dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        debug!(path = %dir.display(), "Initialized JSON record store");
        Ok(Self {
            dir,
            _record: PhantomData,
        })
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let is_plain = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\'])
            && key != "..";
        if !is_plain {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(
                key.to_string(),
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn decode(key: &str, contents: &str) -> Result<T, StorageError> {
        serde_json::from_str(contents).map_err(|e| {
            StorageError::new(StorageErrorKind::CorruptRecord {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
    }
}

#[async_trait::async_trait]
impl<T: Record> RecordStore<T> for JsonRecordStore<T> {
    #[tracing::instrument(skip(self, record), fields(key = %record.record_key()))]
    async fn save(&self, record: &T) -> RepurposeResult<()> {
        let key = record.record_key();
        let path = self.record_path(&key)?;

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| JsonError::new(format!("Failed to serialize record: {}", e)))?;

        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key, uuid::Uuid::new_v4()));
        tokio::fs::write(&temp_path, contents).await.map_err(|e| {
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

        debug!("Saved record");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn load(&self, key: &str) -> RepurposeResult<Option<T>> {
        let path = self.record_path(key)?;

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No record file");
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        Ok(Some(Self::decode(key, &contents)?))
    }

    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn list(&self) -> RepurposeResult<Vec<T>> {
        let read_err = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.dir.display(),
                e
            )))
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(read_err)?;
        let mut records = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            let file_name = entry.file_name();
            let Some(key) = file_name
                .to_str()
                .filter(|name| !name.starts_with('.'))
                .and_then(|name| name.strip_suffix(".json"))
            else {
                continue;
            };

            let contents = match tokio::fs::read_to_string(entry.path()).await {
                Ok(contents) => contents,
                // Deleted between read_dir and read.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(read_err(e).into()),
            };

            match Self::decode(key, &contents) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key, error = %e.kind, "Skipping unreadable record"),
            }
        }

        debug!(count = records.len(), "Listed records");
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> RepurposeResult<bool> {
        let path = self.record_path(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted record");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileDelete(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}
