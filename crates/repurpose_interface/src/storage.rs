//! Trait definitions for file and record persistence.

use async_trait::async_trait;
use repurpose_core::{ContentMetadata, Job, JobResults, ProcessRequest, StoredFile, UserPrompts};
use repurpose_error::RepurposeResult;
use serde::{Serialize, de::DeserializeOwned};

/// Blob storage for uploaded media.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store bytes and return a reference to them.
    async fn put(&self, bytes: &[u8], name: &str, mime_type: &str) -> RepurposeResult<StoredFile>;

    /// Fetch stored bytes. A path that points at nothing yields `None`.
    async fn get(&self, path: &str) -> RepurposeResult<Option<Vec<u8>>>;

    /// Remove stored bytes. Deleting a missing path is not an error.
    async fn delete(&self, path: &str) -> RepurposeResult<()>;

    /// Backend name (e.g., "filesystem", "memory").
    fn backend_name(&self) -> &'static str;
}

/// A value persisted in a [`RecordStore`] under its own key.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key the record is stored under.
    fn record_key(&self) -> String;
}

impl Record for Job {
    fn record_key(&self) -> String {
        self.id.clone()
    }
}

impl Record for ProcessRequest {
    fn record_key(&self) -> String {
        self.job_id.clone()
    }
}

impl Record for JobResults {
    fn record_key(&self) -> String {
        self.job_id.clone()
    }
}

impl Record for ContentMetadata {
    fn record_key(&self) -> String {
        self.id.clone()
    }
}

impl Record for UserPrompts {
    fn record_key(&self) -> String {
        self.user_id.clone()
    }
}

/// Keyed save/load/list/delete over one record type.
///
/// Implementations must allow concurrent access to distinct keys.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Insert or replace a record under its key.
    async fn save(&self, record: &T) -> RepurposeResult<()>;

    /// Load a record by key.
    async fn load(&self, key: &str) -> RepurposeResult<Option<T>>;

    /// Every stored record, in no particular order.
    async fn list(&self) -> RepurposeResult<Vec<T>>;

    /// Delete a record. Returns whether it existed.
    async fn delete(&self, key: &str) -> RepurposeResult<bool>;
}
