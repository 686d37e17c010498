//! The job lifecycle manager.

use crate::{
    GenerationDispatcher, JobRepository, MetadataComposer, PipelineConfig, panic_message,
};
use chrono::Utc;
use derive_builder::Builder;
use futures::FutureExt;
use repurpose_core::{
    ContentMetadata, Job, JobHandle, JobResults, JobStatus, JobSubmission, ProcessRequest,
    SourceType, StoredFile, Upload, unique_targets,
};
use repurpose_error::{BuilderError, BuilderErrorKind, JobError, JobErrorKind, RepurposeResult};
use repurpose_interface::{
    ContentGenerator, ContentSource, DefaultPrompts, FileStore, PreviewGenerator, PromptStore,
    RecordStore, VideoTranscoder,
};
use repurpose_prompts::{DefaultPromptSet, PromptResolver};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Collaborators a [`JobManager`] is assembled from.
#[derive(Builder)]
#[builder(
    name = "JobManagerBuilder",
    public,
    pattern = "owned",
    build_fn(private, name = "build_parts")
)]
struct Collaborators {
    /// Job records
    jobs: Arc<dyn RecordStore<Job>>,
    /// Buffer-stripped requests, keyed by job id
    requests: Arc<dyn RecordStore<ProcessRequest>>,
    /// Dispatch results, keyed by job id
    results: Arc<dyn RecordStore<JobResults>>,
    /// Content history records
    metadata: Arc<dyn RecordStore<ContentMetadata>>,
    /// Blob storage for uploads
    files: Arc<dyn FileStore>,
    /// Content generator invoked once per target
    generator: Arc<dyn ContentGenerator>,
    /// Built-in prompts
    #[builder(default = "Arc::new(DefaultPromptSet::default()) as Arc<dyn DefaultPrompts>")]
    default_prompts: Arc<dyn DefaultPrompts>,
    /// User-saved prompts
    #[builder(default, setter(strip_option))]
    prompt_store: Option<Arc<dyn PromptStore>>,
    /// Video transcoder applied to uploads before storage
    #[builder(default, setter(strip_option))]
    transcoder: Option<Arc<dyn VideoTranscoder>>,
    /// Preview extraction for history records
    #[builder(default, setter(strip_option))]
    preview: Option<Arc<dyn PreviewGenerator>>,
    /// Orchestration settings
    #[builder(default)]
    config: PipelineConfig,
}

impl JobManagerBuilder {
    /// Assemble the manager.
    ///
    /// # Errors
    ///
    /// Returns an error if a required store or the generator was not set.
    pub fn build(self) -> RepurposeResult<JobManager> {
        let parts = self.build_parts().map_err(|e| match e {
            JobManagerBuilderError::UninitializedField(field) => {
                BuilderError::new(BuilderErrorKind::MissingField(field.to_string()))
            }
            other => BuilderError::from(other.to_string()),
        })?;
        Ok(JobManager::from_parts(parts))
    }
}

/// Owns job creation, status transitions and orchestration.
///
/// One physical job covers every requested platform of a submission.
/// Callers see it as one [`JobHandle`] per platform, all sharing the job id.
///
/// Cloning is cheap; clones share stores and per-job locks.
#[derive(Clone)]
pub struct JobManager {
    repository: JobRepository,
    requests: Arc<dyn RecordStore<ProcessRequest>>,
    results: Arc<dyn RecordStore<JobResults>>,
    history: Arc<dyn RecordStore<ContentMetadata>>,
    files: Arc<dyn FileStore>,
    transcoder: Option<Arc<dyn VideoTranscoder>>,
    resolver: PromptResolver,
    dispatcher: GenerationDispatcher,
    composer: MetadataComposer,
    history_limit: usize,
}

impl JobManager {
    /// Creates a new manager builder.
    pub fn builder() -> JobManagerBuilder {
        JobManagerBuilder::default()
    }

    fn from_parts(parts: Collaborators) -> Self {
        let mut resolver = PromptResolver::new(parts.default_prompts);
        if let Some(store) = parts.prompt_store {
            resolver = resolver.with_store(store);
        }

        Self {
            repository: JobRepository::new(parts.jobs),
            requests: parts.requests,
            results: parts.results,
            history: Arc::clone(&parts.metadata),
            files: parts.files,
            transcoder: parts.transcoder,
            resolver,
            dispatcher: GenerationDispatcher::new(parts.generator)
                .with_timeout(parts.config.generation_timeout()),
            composer: MetadataComposer::new(parts.metadata).with_preview(parts.preview),
            history_limit: parts.config.history_limit,
        }
    }

    /// Create one pending job for a submission.
    ///
    /// An uploaded file is written to the file store and only its reference
    /// is persisted; the buffer is released before this returns. Returns one
    /// handle per distinct requested platform.
    ///
    /// # Errors
    ///
    /// - `JobErrorKind::NoTargets` if no platform was requested
    /// - `JobErrorKind::MissingContent` if a text submission has no text, or
    ///   an audio/video submission has no upload
    /// - storage errors from the file, request or job stores; the request and
    ///   upload written so far are removed again
    #[tracing::instrument(
        skip_all,
        fields(source_type = %submission.source_type(), targets = submission.targets().len())
    )]
    pub async fn create_jobs(
        &self,
        mut submission: JobSubmission,
    ) -> RepurposeResult<Vec<JobHandle>> {
        validate(&submission)?;

        let source_type = *submission.source_type();
        let mut job = Job::new(
            source_type,
            submission.targets().clone(),
            submission.user_id().clone(),
        );

        let stored_file = match submission.take_upload() {
            Some(upload) if source_type.is_media() => {
                Some(self.store_upload(source_type, upload).await?)
            }
            _ => None,
        };
        job.stored_file_ref = stored_file.as_ref().map(|file| file.path.clone());

        let request = ProcessRequest::from_submission(&job.id, &submission, stored_file);
        let persisted = match self.requests.save(&request).await {
            Ok(()) => self.repository.create(&job).await,
            Err(e) => Err(e),
        };
        if let Err(e) = persisted {
            self.discard(&request).await;
            return Err(e);
        }

        let handles: Vec<JobHandle> = job
            .unique_targets()
            .into_iter()
            .map(|platform| JobHandle {
                job_id: job.id.clone(),
                platform,
            })
            .collect();

        info!(job_id = %job.id, handles = handles.len(), "Created job");
        Ok(handles)
    }

    /// Create a job and start processing it in the background.
    pub async fn submit(
        &self,
        submission: JobSubmission,
    ) -> RepurposeResult<(Vec<JobHandle>, JoinHandle<RepurposeResult<Job>>)> {
        let handles = self.create_jobs(submission).await?;
        let job_id = handles
            .first()
            .map(|handle| handle.job_id.clone())
            .ok_or_else(|| JobError::new(JobErrorKind::NoTargets))?;
        Ok((handles, self.spawn_job(job_id)))
    }

    /// Run a job to completion and return its terminal record.
    ///
    /// Pipeline faults (including a target list with no recognized platform)
    /// move the job to `failed` and are reported through the
    /// returned job's `error`, not as an `Err`. Individual platform failures
    /// leave the job `completed`.
    ///
    /// # Errors
    ///
    /// - `JobErrorKind::NotFound` if the job does not exist
    /// - `JobErrorKind::InvalidTransition` if the job is not pending (already
    ///   running or finished)
    /// - storage errors while recording the terminal status
    #[tracing::instrument(skip(self))]
    pub async fn process_job(&self, job_id: &str) -> RepurposeResult<Job> {
        let job = self
            .repository
            .update_status(job_id, JobStatus::Processing, None)
            .await?;

        match self.run(&job).await {
            Ok(()) => {
                self.repository
                    .update_status(job_id, JobStatus::Completed, None)
                    .await
            }
            Err(e) => {
                let reason = e.reason();
                warn!(reason = %reason, "Job failed");
                self.repository
                    .update_status(job_id, JobStatus::Failed, Some(reason))
                    .await
            }
        }
    }

    /// Process a job on a background task.
    ///
    /// The handle resolves to the same value as [`JobManager::process_job`].
    /// A panic inside the pipeline fails the job and resolves to
    /// `JobErrorKind::WorkerPanicked`.
    pub fn spawn_job(&self, job_id: impl Into<String>) -> JoinHandle<RepurposeResult<Job>> {
        let manager = self.clone();
        let job_id = job_id.into();

        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(manager.process_job(&job_id))
                .catch_unwind()
                .await;

            match outcome {
                Ok(result) => result,
                Err(panic) => {
                    let reason = format!("worker panicked: {}", panic_message(&*panic));
                    error!(job_id = %job_id, reason = %reason, "Job worker panicked");
                    if let Err(e) = manager
                        .repository
                        .update_status(&job_id, JobStatus::Failed, Some(reason.clone()))
                        .await
                    {
                        warn!(job_id = %job_id, reason = %e.reason(), "Could not mark panicked job failed");
                    }
                    Err(JobError::new(JobErrorKind::WorkerPanicked(reason)).into())
                }
            }
        })
    }

    /// Await a handle from [`JobManager::spawn_job`].
    ///
    /// # Errors
    ///
    /// Returns `JobErrorKind::WorkerPanicked` if the task was cancelled, plus
    /// anything the job itself returned.
    pub async fn join(handle: JoinHandle<RepurposeResult<Job>>) -> RepurposeResult<Job> {
        handle
            .await
            .map_err(|e| JobError::new(JobErrorKind::WorkerPanicked(e.to_string())))?
    }

    /// Move a job to `status`, enforcing the state machine.
    pub async fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
        error: Option<String>,
    ) -> RepurposeResult<Job> {
        self.repository.update_status(job_id, status, error).await
    }

    /// Look up a job.
    pub async fn get_job(&self, job_id: &str) -> RepurposeResult<Option<Job>> {
        self.repository.get(job_id).await
    }

    /// Results of a completed job; `None` for jobs that never completed.
    pub async fn get_job_results(&self, job_id: &str) -> RepurposeResult<Option<JobResults>> {
        self.results.load(job_id).await
    }

    /// History records, most recent first.
    ///
    /// Filters to one user when `user_id` is given. `limit` defaults to the
    /// configured history page size.
    #[tracing::instrument(skip(self))]
    pub async fn get_content_history(
        &self,
        user_id: Option<&str>,
        limit: Option<usize>,
    ) -> RepurposeResult<Vec<ContentMetadata>> {
        let mut records: Vec<ContentMetadata> = self
            .history
            .list()
            .await?
            .into_iter()
            .filter(|record| user_id.is_none_or(|user| record.user_id.as_deref() == Some(user)))
            .collect();

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records.truncate(limit.unwrap_or(self.history_limit));
        Ok(records)
    }

    /// Everything between `processing` and `completed`.
    async fn run(&self, job: &Job) -> RepurposeResult<()> {
        let request = self
            .requests
            .load(&job.id)
            .await?
            .ok_or_else(|| JobError::new(JobErrorKind::RequestNotFound(job.id.clone())))?;

        let targets = unique_targets(&request.targets);
        if targets.is_empty() {
            return Err(JobError::new(JobErrorKind::NoTargets).into());
        }

        let source = self.load_source(job, &request).await?;

        let prompts = self
            .resolver
            .resolve(&targets, request.user_id.as_deref(), &request.custom_prompts)
            .await;
        if prompts.is_empty() {
            return Err(
                JobError::new(JobErrorKind::NoRecognizedTargets(targets.join(", "))).into(),
            );
        }

        let platform_results = self
            .dispatcher
            .dispatch(&source, &targets, &request.profile, &prompts)
            .await;
        drop(source);

        let results = JobResults {
            job_id: job.id.clone(),
            source_text: request.content.clone(),
            platform_results,
            completed_at: Utc::now(),
        };
        self.results.save(&results).await?;

        self.composer
            .record(job, &request, &results.platform_results, &prompts)
            .await;
        Ok(())
    }

    async fn load_source(
        &self,
        job: &Job,
        request: &ProcessRequest,
    ) -> RepurposeResult<ContentSource> {
        if !job.source_type.is_media() {
            let text = request.content.clone().ok_or_else(|| {
                JobError::new(JobErrorKind::MissingContent(job.source_type.to_string()))
            })?;
            return Ok(ContentSource::Text(text));
        }

        let file = request
            .stored_file
            .clone()
            .ok_or_else(|| JobError::new(JobErrorKind::MissingStoredFile(job.id.clone())))?;

        let bytes = self.files.get(&file.path).await?.ok_or_else(|| {
            JobError::new(JobErrorKind::StoredFileUnavailable(file.path.clone()))
        })?;

        Ok(ContentSource::Media {
            bytes,
            file,
            source_type: job.source_type,
        })
    }

    /// Remove what a failed `create_jobs` left behind.
    ///
    /// The upload is kept when another request still references the same
    /// content-addressed file.
    async fn discard(&self, request: &ProcessRequest) {
        if let Err(e) = self.requests.delete(&request.job_id).await {
            warn!(job_id = %request.job_id, reason = %e.reason(), "Could not remove orphaned request");
        }

        let Some(file) = &request.stored_file else {
            return;
        };
        match self.requests.list().await {
            Ok(others) => {
                let shared = others.iter().any(|other| {
                    other
                        .stored_file
                        .as_ref()
                        .is_some_and(|stored| stored.path == file.path)
                });
                if shared {
                    debug!(path = %file.path, "Upload shared with another request, keeping");
                } else if let Err(e) = self.files.delete(&file.path).await {
                    warn!(path = %file.path, reason = %e.reason(), "Could not remove orphaned upload");
                }
            }
            Err(e) => {
                warn!(path = %file.path, reason = %e.reason(), "Could not check upload references, keeping file");
            }
        }
    }

    /// Write an upload to the file store, transcoding video first when possible.
    async fn store_upload(
        &self,
        source_type: SourceType,
        upload: Upload,
    ) -> RepurposeResult<StoredFile> {
        let Upload {
            bytes,
            name,
            mime_type,
        } = upload;

        let (bytes, name, mime_type) = match (&self.transcoder, source_type) {
            (Some(transcoder), SourceType::Video) => {
                match transcoder.process(&bytes, &name, &mime_type).await {
                    Ok(media) if media.converted => {
                        info!(from = %mime_type, to = %media.mime_type, "Transcoded video upload");
                        (media.bytes, media.name, media.mime_type)
                    }
                    Ok(_) => (bytes, name, mime_type),
                    Err(e) => {
                        warn!(reason = %e.reason(), "Video transcoding failed, storing original");
                        (bytes, name, mime_type)
                    }
                }
            }
            _ => (bytes, name, mime_type),
        };

        self.files.put(&bytes, &name, &mime_type).await
    }
}

fn validate(submission: &JobSubmission) -> RepurposeResult<()> {
    if submission.targets().is_empty() {
        return Err(JobError::new(JobErrorKind::NoTargets).into());
    }

    let source_type = submission.source_type();
    let has_content = if source_type.is_media() {
        submission.upload().is_some()
    } else {
        submission
            .content()
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    };

    if !has_content {
        return Err(JobError::new(JobErrorKind::MissingContent(source_type.to_string())).into());
    }
    Ok(())
}
