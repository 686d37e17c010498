//! Trait definitions for generation and prompt collaborators.

use crate::{GenerationRequest, TranscodedMedia};
use async_trait::async_trait;
use repurpose_core::{Platform, PlatformContent, PreviewData, SourceType, StoredFile};
use repurpose_error::RepurposeResult;

/// Produces platform content from a source and a final prompt.
///
/// Called once per target. An `Err` becomes that target's failed result;
/// its reason is recorded verbatim.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate content for one target.
    async fn generate(&self, request: &GenerationRequest<'_>) -> RepurposeResult<PlatformContent>;

    /// Generator name (e.g., "gemini", "scripted").
    fn provider_name(&self) -> &str;
}

/// Read access to prompts users have saved.
///
/// `Ok(None)` means the user saved nothing; callers treat `Err` as
/// "nothing saved" and fall back to defaults.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// The user's saved global character prompt.
    async fn global_prompt(&self, user_id: &str) -> RepurposeResult<Option<String>>;

    /// The user's saved prompt for a platform.
    async fn platform_prompt(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> RepurposeResult<Option<String>>;
}

/// Built-in prompts used when a user has saved none.
pub trait DefaultPrompts: Send + Sync {
    /// Default global character prompt.
    fn global_prompt(&self) -> String;

    /// Default prompt for a platform.
    fn platform_prompt(&self, platform: Platform) -> String;
}

/// Converts uploaded video into a format generators accept.
#[async_trait]
pub trait VideoTranscoder: Send + Sync {
    /// Transcode a video buffer.
    ///
    /// Implementations that leave the input untouched return it with
    /// `converted == false`.
    async fn process(
        &self,
        bytes: &[u8],
        name: &str,
        mime_type: &str,
    ) -> RepurposeResult<TranscodedMedia>;
}

/// Extracts transcripts and thumbnails from stored media.
#[async_trait]
pub trait PreviewGenerator: Send + Sync {
    /// Build preview data for a stored file.
    async fn generate(
        &self,
        file: &StoredFile,
        source_type: SourceType,
    ) -> RepurposeResult<PreviewData>;
}
