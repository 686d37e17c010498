//! Content history records.

use crate::{PlatformContent, PromptDetail, SourceType, StoredFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Preview extracted from an audio/video source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewData {
    /// Transcript of the spoken content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Path of a generated thumbnail image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    /// Media length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

/// Content one platform produced, as kept in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    /// Target identifier as requested
    pub platform: String,
    /// The generated content
    pub content: PlatformContent,
}

/// Durable history record summarizing one job's attempt.
///
/// Created once per job after dispatch, whether or not any platform
/// succeeded. Only successful platforms contribute content and prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    /// History record id (distinct from the job id)
    pub id: String,
    /// Job the record was composed from
    pub job_id: String,
    /// Kind of source content
    pub source_type: SourceType,
    /// Submitting user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// When the record was composed
    pub created_at: DateTime<Utc>,
    /// Source text, for text sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    /// Uploaded file, for audio/video sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_info: Option<StoredFile>,
    /// Preview/transcript, when extraction succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewData>,
    /// Successful content, in target order
    pub generated_content: Vec<GeneratedContent>,
    /// Prompts that produced the successful content, keyed by target
    pub used_prompts: BTreeMap<String, PromptDetail>,
}
