//! Job submission and persisted request types.

use crate::{SourceType, StoredFile, Upload};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Audience and voice hints forwarded to the content generator.
///
/// # Examples
///
/// ```
/// use repurpose_core::ContentProfile;
///
/// let profile = ContentProfile::default()
///     .with_tone("playful")
///     .with_audience("indie developers");
///
/// assert_eq!(profile.tone.as_deref(), Some("playful"));
/// assert!(profile.cta.is_none());
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters,
)]
#[setters(prefix = "with_", into, strip_option)]
pub struct ContentProfile {
    /// Voice of the output (e.g., "professional", "playful")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    /// Who the content is written for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// What the content should achieve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Call to action to close with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
}

/// An incoming request to repurpose one source for several platforms.
///
/// Carries the uploaded buffer, if any. It is never persisted as-is; see
/// [`ProcessRequest`].
///
/// # Examples
///
/// ```
/// use repurpose_core::{JobSubmission, SourceType};
///
/// let submission = JobSubmission::builder()
///     .source_type(SourceType::Text)
///     .content("hello")
///     .targets(vec!["twitter".to_string(), "threads".to_string()])
///     .build()
///     .unwrap();
///
/// assert_eq!(submission.targets().len(), 2);
/// assert!(submission.upload().is_none());
/// ```
#[derive(Debug, Clone, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct JobSubmission {
    /// Kind of source content
    source_type: SourceType,
    /// Inline text (text sources)
    #[builder(default, setter(into, strip_option))]
    content: Option<String>,
    /// Uploaded file (audio/video sources)
    #[builder(default, setter(into, strip_option))]
    upload: Option<Upload>,
    /// Requested platforms, in request order
    targets: Vec<String>,
    /// Audience and voice hints
    #[builder(default)]
    profile: ContentProfile,
    /// Complete prompts keyed by platform, bypassing prompt resolution
    #[builder(default)]
    custom_prompts: HashMap<String, String>,
    /// Submitting user
    #[builder(default, setter(into, strip_option))]
    user_id: Option<String>,
}

impl JobSubmission {
    /// Creates a new submission builder.
    pub fn builder() -> JobSubmissionBuilder {
        JobSubmissionBuilder::default()
    }

    /// Take ownership of the upload buffer, leaving `None` behind.
    pub fn take_upload(&mut self) -> Option<Upload> {
        self.upload.take()
    }
}

impl JobSubmissionBuilder {
    /// Build the submission.
    ///
    /// # Errors
    ///
    /// Returns an error if `source_type` or `targets` was never set.
    pub fn build(&self) -> Result<JobSubmission, String> {
        self.build_internal().map_err(|e| e.to_string())
    }
}

/// The durable, buffer-stripped copy of a submission.
///
/// Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    /// Job this request belongs to
    pub job_id: String,
    /// Kind of source content
    pub source_type: SourceType,
    /// Inline text (text sources)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Reference to the uploaded file (audio/video sources)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_file: Option<StoredFile>,
    /// Requested platforms, in request order
    pub targets: Vec<String>,
    /// Audience and voice hints
    #[serde(default)]
    pub profile: ContentProfile,
    /// Complete prompts keyed by platform
    #[serde(default)]
    pub custom_prompts: HashMap<String, String>,
    /// Submitting user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ProcessRequest {
    /// Strip a submission down to its persistable form.
    ///
    /// The upload buffer is not carried over; callers pass the reference the
    /// file store returned for it instead.
    pub fn from_submission(
        job_id: impl Into<String>,
        submission: &JobSubmission,
        stored_file: Option<StoredFile>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            source_type: submission.source_type,
            content: submission.content.clone(),
            stored_file,
            targets: submission.targets.clone(),
            profile: submission.profile.clone(),
            custom_prompts: submission.custom_prompts.clone(),
            user_id: submission.user_id.clone(),
        }
    }
}
