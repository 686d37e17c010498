//! Job lifecycle error types.

/// Specific error conditions raised while creating or running a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum JobErrorKind {
    /// No job exists with the given id
    #[display("Job '{}' not found", _0)]
    NotFound(String),
    /// The persisted request for a job is missing
    #[display("Process request for job '{}' not found", _0)]
    RequestNotFound(String),
    /// Status change would regress or skip the job state machine
    #[display("Job '{}' cannot move from {} to {}", job_id, from, to)]
    InvalidTransition {
        /// Job being updated
        job_id: String,
        /// Current persisted status
        from: String,
        /// Requested status
        to: String,
    },
    /// Audio/video job has no stored file reference
    #[display("Job '{}' has no stored file reference", _0)]
    MissingStoredFile(String),
    /// Stored file reference points at nothing
    #[display("Stored file '{}' is unavailable", _0)]
    StoredFileUnavailable(String),
    /// Request carries no target platforms
    #[display("At least one target platform is required")]
    NoTargets,
    /// Every target is an unrecognized platform
    #[display("No recognized platform among targets: {}", _0)]
    NoRecognizedTargets(String),
    /// Text request without content, or media request without an upload
    #[display("Request has no content for source type {}", _0)]
    MissingContent(String),
    /// Spawned job task panicked or was aborted
    #[display("Job worker stopped unexpectedly: {}", _0)]
    WorkerPanicked(String),
}

/// Error type for job lifecycle operations.
///
/// # Examples
///
/// ```
/// use repurpose_error::{JobError, JobErrorKind};
///
/// let err = JobError::new(JobErrorKind::NoTargets);
/// assert!(format!("{}", err).contains("target platform"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Job Error: {} at line {} in {}", kind, line, file)]
pub struct JobError {
    /// The specific error condition
    pub kind: JobErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl JobError {
    /// Create a new JobError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: JobErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
