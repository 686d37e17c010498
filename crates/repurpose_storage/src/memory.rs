//! In-memory storage backends.
//!
//! HashMap-based stores behind an `RwLock`. All data is lost when the last
//! clone is dropped. Useful for tests and single-process demos.

use crate::{compute_hash, content_path};
use repurpose_core::StoredFile;
use repurpose_error::RepurposeResult;
use repurpose_interface::{FileStore, Record, RecordStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory content-addressed file store.
///
/// Uses the same path layout as
/// [`FileSystemFileStore`](crate::FileSystemFileStore).
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileStore {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blobs held.
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    /// Whether the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl FileStore for InMemoryFileStore {
    async fn put(&self, bytes: &[u8], name: &str, mime_type: &str) -> RepurposeResult<StoredFile> {
        let path = content_path(&compute_hash(bytes), mime_type);
        self.files
            .write()
            .await
            .entry(path.clone())
            .or_insert_with(|| bytes.to_vec());

        tracing::debug!(path = %path, size = bytes.len(), "Stored file in memory");
        Ok(StoredFile {
            path,
            size: bytes.len() as u64,
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    async fn get(&self, path: &str) -> RepurposeResult<Option<Vec<u8>>> {
        Ok(self.files.read().await.get(path).cloned())
    }

    async fn delete(&self, path: &str) -> RepurposeResult<()> {
        self.files.write().await.remove(path);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// In-memory record store.
///
/// # Example
///
/// ```
/// use repurpose_core::{Job, SourceType};
/// use repurpose_interface::RecordStore;
/// use repurpose_storage::InMemoryRecordStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryRecordStore::<Job>::new();
/// let job = Job::new(SourceType::Text, vec!["twitter".to_string()], None);
/// store.save(&job).await?;
///
/// assert_eq!(store.load(&job.id).await?, Some(job));
/// # Ok(())
/// # }
/// ```
pub struct InMemoryRecordStore<T> {
    records: Arc<RwLock<HashMap<String, T>>>,
}

impl<T> InMemoryRecordStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InMemoryRecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T> std::fmt::Debug for InMemoryRecordStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<T: Record> RecordStore<T> for InMemoryRecordStore<T> {
    async fn save(&self, record: &T) -> RepurposeResult<()> {
        self.records
            .write()
            .await
            .insert(record.record_key(), record.clone());
        Ok(())
    }

    async fn load(&self, key: &str) -> RepurposeResult<Option<T>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn list(&self) -> RepurposeResult<Vec<T>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn delete(&self, key: &str) -> RepurposeResult<bool> {
        Ok(self.records.write().await.remove(key).is_some())
    }
}
