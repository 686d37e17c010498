//! Test utilities for pipeline tests.
//!
//! This module provides scripted collaborators and a harness that wires a
//! `JobManager` over in-memory stores.

#![allow(dead_code)]

pub mod collaborators;
pub mod scripted_generator;

#[allow(unused_imports)]
pub use collaborators::{
    FailingPreview, FailingTranscoder, StaticPreview, UnavailablePromptStore, UnavailableStore,
    WebmTranscoder,
};
#[allow(unused_imports)]
pub use scripted_generator::{Outcome, RecordedCall, ScriptedGenerator};

use repurpose_core::{
    ContentMetadata, Job, JobResults, JobSubmission, ProcessRequest, SourceType, Upload,
};
use repurpose_pipeline::{JobManager, JobManagerBuilder};
use repurpose_prompts::DefaultPromptSet;
use repurpose_storage::{InMemoryFileStore, InMemoryRecordStore};
use std::sync::Arc;

/// Default prompts with short, recognizable text.
pub fn test_defaults() -> DefaultPromptSet {
    DefaultPromptSet::default()
        .with_global_prompt("GLOBAL")
        .with_platform_prompt("twitter", "TWITTER")
        .with_platform_prompt("threads", "THREADS")
        .with_platform_prompt("blog", "BLOG")
}

/// A text submission for the given targets.
pub fn text_submission(content: &str, targets: &[&str]) -> JobSubmission {
    JobSubmission::builder()
        .source_type(SourceType::Text)
        .content(content)
        .targets(strings(targets))
        .build()
        .unwrap()
}

/// A media submission carrying an upload.
pub fn media_submission(
    source_type: SourceType,
    upload: Upload,
    targets: &[&str],
) -> JobSubmission {
    JobSubmission::builder()
        .source_type(source_type)
        .upload(upload)
        .targets(strings(targets))
        .build()
        .unwrap()
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// A manager over in-memory stores, with handles to inspect them.
pub struct Harness {
    pub manager: JobManager,
    pub jobs: InMemoryRecordStore<Job>,
    pub requests: InMemoryRecordStore<ProcessRequest>,
    pub results: InMemoryRecordStore<JobResults>,
    pub history: InMemoryRecordStore<ContentMetadata>,
    pub files: InMemoryFileStore,
    pub generator: Arc<ScriptedGenerator>,
}

impl Harness {
    pub fn new(generator: ScriptedGenerator) -> Self {
        Self::with(generator, |builder| builder)
    }

    pub fn with(
        generator: ScriptedGenerator,
        customize: impl FnOnce(JobManagerBuilder) -> JobManagerBuilder,
    ) -> Self {
        let jobs = InMemoryRecordStore::new();
        let requests = InMemoryRecordStore::new();
        let results = InMemoryRecordStore::new();
        let history = InMemoryRecordStore::new();
        let files = InMemoryFileStore::new();
        let generator = Arc::new(generator);

        let builder = JobManager::builder()
            .jobs(Arc::new(jobs.clone()))
            .requests(Arc::new(requests.clone()))
            .results(Arc::new(results.clone()))
            .metadata(Arc::new(history.clone()))
            .files(Arc::new(files.clone()))
            .generator(generator.clone())
            .default_prompts(Arc::new(test_defaults()));

        let manager = customize(builder).build().unwrap();

        Self {
            manager,
            jobs,
            requests,
            results,
            history,
            files,
            generator,
        }
    }

    /// Create a job and run it to completion.
    pub async fn run(&self, submission: JobSubmission) -> Job {
        let handles = self.manager.create_jobs(submission).await.unwrap();
        self.manager.process_job(&handles[0].job_id).await.unwrap()
    }
}
