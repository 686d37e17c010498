//! Generation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content produced for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct PlatformContent {
    /// Main post/article text
    pub body: String,
    /// Headline or subject line, for platforms that have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[new(default)]
    pub title: Option<String>,
    /// Suggested hashtags, without the leading `#`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[new(default)]
    pub hashtags: Vec<String>,
}

/// Outcome of one generation attempt.
///
/// Exactly one exists per requested (deduplicated) target, in target order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResult {
    /// Target identifier as requested
    pub platform: String,
    /// Whether generation produced content
    pub success: bool,
    /// Generated content, on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<PlatformContent>,
    /// Failure message, on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlatformResult {
    /// A successful result.
    pub fn succeeded(platform: impl Into<String>, content: PlatformContent) -> Self {
        Self {
            platform: platform.into(),
            success: true,
            content: Some(content),
            error: None,
        }
    }

    /// A failed result.
    pub fn failed(platform: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            success: false,
            content: None,
            error: Some(error.into()),
        }
    }
}

/// Persisted outcome of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResults {
    /// Job these results belong to
    pub job_id: String,
    /// Source text, for text sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    /// One result per deduplicated target, in target order
    pub platform_results: Vec<PlatformResult>,
    /// When dispatch settled
    pub completed_at: DateTime<Utc>,
}

impl JobResults {
    /// Number of platforms that produced content.
    pub fn success_count(&self) -> usize {
        self.platform_results.iter().filter(|r| r.success).count()
    }
}
