//! Job records and the job status state machine.

use crate::SourceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a job.
///
/// Transitions only move forward:
///
/// ```text
/// pending ──► processing ──► completed
///    │             │
///    └─────────────┴───────► failed
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, not yet picked up
    #[default]
    #[display("pending")]
    Pending,
    /// Prompts resolving or generation in flight
    #[display("processing")]
    Processing,
    /// Dispatch settled (individual platforms may still have failed)
    #[display("completed")]
    Completed,
    /// Pipeline-level fault; terminal
    #[display("failed")]
    Failed,
}

impl JobStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether moving from `self` to `next` respects the state machine.
    ///
    /// # Examples
    ///
    /// ```
    /// use repurpose_core::JobStatus;
    ///
    /// assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
    /// assert!(JobStatus::Processing.can_transition_to(JobStatus::Completed));
    /// assert!(!JobStatus::Completed.can_transition_to(JobStatus::Processing));
    /// assert!(!JobStatus::Processing.can_transition_to(JobStatus::Processing));
    /// ```
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Pending, JobStatus::Failed)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

/// One orchestration unit covering every requested platform for a single source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique job identifier
    pub id: String,
    /// Kind of source content
    pub source_type: SourceType,
    /// Targets exactly as requested (duplicates preserved)
    pub targets: Vec<String>,
    /// Current lifecycle state
    pub status: JobStatus,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the job record last changed
    pub updated_at: DateTime<Utc>,
    /// Submitting user, if authenticated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Pipeline-level failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Path of the uploaded file in the file store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_file_ref: Option<String>,
}

impl Job {
    /// Create a pending job with a fresh identifier.
    pub fn new(source_type: SourceType, targets: Vec<String>, user_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_type,
            targets,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            user_id,
            error: None,
            stored_file_ref: None,
        }
    }

    /// Targets deduplicated by first occurrence, order preserved.
    pub fn unique_targets(&self) -> Vec<String> {
        unique_targets(&self.targets)
    }
}

/// Deduplicate targets by first occurrence, preserving order.
///
/// # Examples
///
/// ```
/// use repurpose_core::unique_targets;
///
/// let targets = vec!["twitter".to_string(), "blog".to_string(), "twitter".to_string()];
/// assert_eq!(unique_targets(&targets), vec!["twitter", "blog"]);
/// ```
pub fn unique_targets(targets: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    targets
        .iter()
        .filter(|target| seen.insert(*target))
        .cloned()
        .collect()
}

/// One logical `(job, platform)` pair handed back to callers.
///
/// All handles created by one submission share the same `job_id`; the
/// platform lets clients poll per-platform results individually.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    /// Shared physical job id
    pub job_id: String,
    /// Requested platform identifier
    pub platform: String,
}
