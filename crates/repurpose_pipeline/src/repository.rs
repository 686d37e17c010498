//! Job persistence with serialized status updates.

use chrono::Utc;
use repurpose_core::{Job, JobStatus};
use repurpose_error::{JobError, JobErrorKind, RepurposeResult};
use repurpose_interface::RecordStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Job store wrapper enforcing the job state machine.
///
/// Status updates are read-modify-write against the backing store. Writers
/// for the same job id are serialized through a per-id lock, and every
/// transition is checked against [`JobStatus::can_transition_to`], so a
/// second concurrent start of the same job is rejected rather than run.
#[derive(Clone)]
pub struct JobRepository {
    jobs: Arc<dyn RecordStore<Job>>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl JobRepository {
    /// Wrap a job record store.
    pub fn new(jobs: Arc<dyn RecordStore<Job>>) -> Self {
        Self {
            jobs,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Persist a newly created job.
    pub async fn create(&self, job: &Job) -> RepurposeResult<()> {
        self.jobs.save(job).await?;
        debug!(job_id = %job.id, status = %job.status, "Created job record");
        Ok(())
    }

    /// Load a job by id.
    pub async fn get(&self, job_id: &str) -> RepurposeResult<Option<Job>> {
        self.jobs.load(job_id).await
    }

    /// Move a job to `status`, recording `error` when given.
    ///
    /// # Errors
    ///
    /// - `JobErrorKind::NotFound` if no job has this id
    /// - `JobErrorKind::InvalidTransition` if the move would regress or skip
    ///   a state, including any move out of `completed` or `failed`
    #[tracing::instrument(skip(self, error))]
    pub async fn update_status(
        &self,
        job_id: &str,
        status: JobStatus,
        error: Option<String>,
    ) -> RepurposeResult<Job> {
        let lock = self.lock_for(job_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.transition(job_id, status, error).await
        };
        self.release(job_id, lock).await;
        result
    }

    async fn transition(
        &self,
        job_id: &str,
        status: JobStatus,
        error: Option<String>,
    ) -> RepurposeResult<Job> {
        let mut job = self
            .jobs
            .load(job_id)
            .await?
            .ok_or_else(|| JobError::new(JobErrorKind::NotFound(job_id.to_string())))?;

        if !job.status.can_transition_to(status) {
            return Err(JobError::new(JobErrorKind::InvalidTransition {
                job_id: job_id.to_string(),
                from: job.status.to_string(),
                to: status.to_string(),
            })
            .into());
        }

        let from = job.status;
        job.status = status;
        job.updated_at = Utc::now();
        if error.is_some() {
            job.error = error;
        }
        self.jobs.save(&job).await?;

        info!(job_id, from = %from, to = %status, "Job status changed");
        Ok(job)
    }

    async fn lock_for(&self, job_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(job_id.to_string()).or_default())
    }

    /// Drop the per-id lock once no other writer holds a handle to it.
    async fn release(&self, job_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        // One reference in the map, one here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(job_id);
        }
    }
}
