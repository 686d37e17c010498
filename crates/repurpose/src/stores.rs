//! File-backed stores under one data directory.

use repurpose_core::{ContentMetadata, Job, JobResults, ProcessRequest, UserPrompts};
use repurpose_error::RepurposeResult;
use repurpose_pipeline::{JobManager, JobManagerBuilder, RepurposeConfig};
use repurpose_prompts::RecordPromptStore;
use repurpose_storage::{FileSystemFileStore, JsonRecordStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Every durable store the pipeline needs, laid out under one root:
///
/// ```text
/// {root}/
///   jobs/       Job records
///   requests/   buffer-stripped process requests
///   results/    per-job platform results
///   history/    content history records
///   prompts/    saved user prompts
///   files/      content-addressed uploads
/// ```
#[derive(Clone)]
pub struct DataStores {
    root: PathBuf,
    /// Job records
    pub jobs: Arc<JsonRecordStore<Job>>,
    /// Process requests
    pub requests: Arc<JsonRecordStore<ProcessRequest>>,
    /// Job results
    pub results: Arc<JsonRecordStore<JobResults>>,
    /// Content history
    pub history: Arc<JsonRecordStore<ContentMetadata>>,
    /// Saved user prompts
    pub prompts: Arc<JsonRecordStore<UserPrompts>>,
    /// Uploaded files
    pub files: Arc<FileSystemFileStore>,
}

impl DataStores {
    /// Open (creating as needed) the stores under `root`.
    pub fn open(root: impl AsRef<Path>) -> RepurposeResult<Self> {
        let root = root.as_ref().to_path_buf();
        debug!(root = %root.display(), "Opening data stores");

        Ok(Self {
            jobs: Arc::new(JsonRecordStore::new(root.join("jobs"))?),
            requests: Arc::new(JsonRecordStore::new(root.join("requests"))?),
            results: Arc::new(JsonRecordStore::new(root.join("results"))?),
            history: Arc::new(JsonRecordStore::new(root.join("history"))?),
            prompts: Arc::new(JsonRecordStore::new(root.join("prompts"))?),
            files: Arc::new(FileSystemFileStore::new(root.join("files"))?),
            root,
        })
    }

    /// Root directory of the stores.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Saved prompts, readable and writable.
    pub fn prompt_store(&self) -> RecordPromptStore {
        RecordPromptStore::new(self.prompts.clone())
    }

    /// A manager builder wired to these stores and `config`.
    ///
    /// Only the content generator (and optional media collaborators) remain
    /// to be set.
    pub fn manager_builder(&self, config: &RepurposeConfig) -> JobManagerBuilder {
        JobManager::builder()
            .jobs(self.jobs.clone())
            .requests(self.requests.clone())
            .results(self.results.clone())
            .metadata(self.history.clone())
            .files(self.files.clone())
            .default_prompts(Arc::new(config.prompts.clone()))
            .prompt_store(Arc::new(self.prompt_store()))
            .config(config.pipeline.clone())
    }
}
