//! Failing and canned collaborators.

use async_trait::async_trait;
use repurpose_core::{Platform, PreviewData, SourceType, StoredFile};
use repurpose_error::{
    BackendError, PromptError, RepurposeResult, StorageError, StorageErrorKind,
};
use repurpose_interface::{
    PreviewGenerator, PromptStore, Record, RecordStore, TranscodedMedia, VideoTranscoder,
};

/// Record store whose every operation fails.
pub struct UnavailableStore;

fn unavailable() -> StorageError {
    StorageError::new(StorageErrorKind::Unavailable("disk full".to_string()))
}

#[async_trait]
impl<T: Record> RecordStore<T> for UnavailableStore {
    async fn save(&self, _record: &T) -> RepurposeResult<()> {
        Err(unavailable())?
    }

    async fn load(&self, _key: &str) -> RepurposeResult<Option<T>> {
        Err(unavailable())?
    }

    async fn list(&self) -> RepurposeResult<Vec<T>> {
        Err(unavailable())?
    }

    async fn delete(&self, _key: &str) -> RepurposeResult<bool> {
        Err(unavailable())?
    }
}

/// Prompt store that is never reachable.
pub struct UnavailablePromptStore;

#[async_trait]
impl PromptStore for UnavailablePromptStore {
    async fn global_prompt(&self, _user_id: &str) -> RepurposeResult<Option<String>> {
        Err(PromptError::new("prompt store unreachable"))?
    }

    async fn platform_prompt(
        &self,
        _user_id: &str,
        _platform: Platform,
    ) -> RepurposeResult<Option<String>> {
        Err(PromptError::new("prompt store unreachable"))?
    }
}

/// Preview generator returning a fixed transcript.
pub struct StaticPreview;

#[async_trait]
impl PreviewGenerator for StaticPreview {
    async fn generate(
        &self,
        file: &StoredFile,
        _source_type: SourceType,
    ) -> RepurposeResult<PreviewData> {
        Ok(PreviewData {
            transcript: Some(format!("transcript of {}", file.name)),
            thumbnail_path: None,
            duration_seconds: Some(42.0),
        })
    }
}

/// Preview generator that always fails.
pub struct FailingPreview;

#[async_trait]
impl PreviewGenerator for FailingPreview {
    async fn generate(
        &self,
        _file: &StoredFile,
        _source_type: SourceType,
    ) -> RepurposeResult<PreviewData> {
        Err(BackendError::new("ffprobe not installed"))?
    }
}

/// Transcoder that "converts" anything to WebM by prefixing the bytes.
pub struct WebmTranscoder;

#[async_trait]
impl VideoTranscoder for WebmTranscoder {
    async fn process(
        &self,
        bytes: &[u8],
        name: &str,
        _mime_type: &str,
    ) -> RepurposeResult<TranscodedMedia> {
        let mut converted = b"WEBM".to_vec();
        converted.extend_from_slice(bytes);
        Ok(TranscodedMedia {
            bytes: converted,
            name: format!("{}.webm", name),
            mime_type: "video/webm".to_string(),
            converted: true,
        })
    }
}

/// Transcoder that always fails.
pub struct FailingTranscoder;

#[async_trait]
impl VideoTranscoder for FailingTranscoder {
    async fn process(
        &self,
        _bytes: &[u8],
        _name: &str,
        _mime_type: &str,
    ) -> RepurposeResult<TranscodedMedia> {
        Err(BackendError::new("codec not supported"))?
    }
}
