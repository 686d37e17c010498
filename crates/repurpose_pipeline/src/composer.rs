//! History record composition.

use chrono::Utc;
use repurpose_core::{
    ContentMetadata, GeneratedContent, Job, PlatformResult, PreviewData, ProcessRequest,
};
use repurpose_interface::{PreviewGenerator, RecordStore};
use repurpose_prompts::ResolvedPrompts;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds and stores one history record per dispatched job.
///
/// A record is written even when every platform failed. Only successful
/// platforms contribute content and prompts. Preview extraction and
/// persistence are best-effort: failures are logged and never reach the
/// caller.
#[derive(Clone)]
pub struct MetadataComposer {
    store: Arc<dyn RecordStore<ContentMetadata>>,
    preview: Option<Arc<dyn PreviewGenerator>>,
}

impl MetadataComposer {
    /// Create a composer writing to `store`.
    pub fn new(store: Arc<dyn RecordStore<ContentMetadata>>) -> Self {
        Self {
            store,
            preview: None,
        }
    }

    /// Add a preview generator for audio/video sources.
    pub fn with_preview(mut self, preview: Option<Arc<dyn PreviewGenerator>>) -> Self {
        self.preview = preview;
        self
    }

    /// Build the history record for a dispatched job.
    pub async fn compose(
        &self,
        job: &Job,
        request: &ProcessRequest,
        results: &[PlatformResult],
        prompts: &ResolvedPrompts,
    ) -> ContentMetadata {
        let mut generated_content = Vec::new();
        let mut used_prompts = BTreeMap::new();

        for result in results.iter().filter(|r| r.success) {
            if let Some(content) = &result.content {
                generated_content.push(GeneratedContent {
                    platform: result.platform.clone(),
                    content: content.clone(),
                });
            }
            if let Some(detail) = prompts.get(&result.platform) {
                used_prompts.insert(result.platform.clone(), detail.clone());
            }
        }

        ContentMetadata {
            id: uuid::Uuid::new_v4().to_string(),
            job_id: job.id.clone(),
            source_type: job.source_type,
            user_id: job.user_id.clone(),
            created_at: Utc::now(),
            source_text: request.content.clone(),
            file_info: request.stored_file.clone(),
            preview: self.preview_for(job, request).await,
            generated_content,
            used_prompts,
        }
    }

    /// Compose and persist the history record.
    ///
    /// Returns the record when it was stored, `None` when persistence failed.
    #[tracing::instrument(skip_all, fields(job_id = %job.id))]
    pub async fn record(
        &self,
        job: &Job,
        request: &ProcessRequest,
        results: &[PlatformResult],
        prompts: &ResolvedPrompts,
    ) -> Option<ContentMetadata> {
        let metadata = self.compose(job, request, results, prompts).await;

        match self.store.save(&metadata).await {
            Ok(()) => {
                info!(
                    metadata_id = %metadata.id,
                    generated = metadata.generated_content.len(),
                    "Recorded content history"
                );
                Some(metadata)
            }
            Err(e) => {
                warn!(reason = %e.reason(), "Failed to persist content history");
                None
            }
        }
    }

    async fn preview_for(&self, job: &Job, request: &ProcessRequest) -> Option<PreviewData> {
        if !job.source_type.is_media() {
            return None;
        }
        let (Some(preview), Some(file)) = (&self.preview, &request.stored_file) else {
            return None;
        };

        match preview.generate(file, job.source_type).await {
            Ok(data) => {
                debug!(path = %file.path, "Generated preview");
                Some(data)
            }
            Err(e) => {
                warn!(path = %file.path, reason = %e.reason(), "Preview extraction failed");
                None
            }
        }
    }
}
