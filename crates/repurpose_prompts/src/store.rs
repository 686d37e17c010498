//! Prompt store backed by a record store.

use async_trait::async_trait;
use repurpose_core::{Platform, UserPrompts};
use repurpose_error::RepurposeResult;
use repurpose_interface::{PromptStore, RecordStore};
use std::sync::Arc;

/// [`PromptStore`] over one [`UserPrompts`] record per user.
///
/// Works with any record store: in-memory for tests, JSON files for the CLI.
#[derive(Clone)]
pub struct RecordPromptStore {
    records: Arc<dyn RecordStore<UserPrompts>>,
}

impl RecordPromptStore {
    /// Wrap a record store.
    pub fn new(records: Arc<dyn RecordStore<UserPrompts>>) -> Self {
        Self { records }
    }

    /// Save (or clear, with `None`) a user's global character prompt.
    #[tracing::instrument(skip(self, prompt))]
    pub async fn save_global_prompt(
        &self,
        user_id: &str,
        prompt: Option<String>,
    ) -> RepurposeResult<()> {
        let mut prompts = self.load_or_new(user_id).await?;
        prompts.global = prompt;
        self.records.save(&prompts).await
    }

    /// Save (or clear, with `None`) a user's prompt for one platform.
    #[tracing::instrument(skip(self, prompt))]
    pub async fn save_platform_prompt(
        &self,
        user_id: &str,
        platform: Platform,
        prompt: Option<String>,
    ) -> RepurposeResult<()> {
        let mut prompts = self.load_or_new(user_id).await?;
        match prompt {
            Some(prompt) => prompts.platforms.insert(platform, prompt),
            None => prompts.platforms.remove(&platform),
        };
        self.records.save(&prompts).await
    }

    async fn load_or_new(&self, user_id: &str) -> RepurposeResult<UserPrompts> {
        Ok(self
            .records
            .load(user_id)
            .await?
            .unwrap_or_else(|| UserPrompts::new(user_id)))
    }
}

#[async_trait]
impl PromptStore for RecordPromptStore {
    async fn global_prompt(&self, user_id: &str) -> RepurposeResult<Option<String>> {
        Ok(self
            .records
            .load(user_id)
            .await?
            .and_then(|prompts| prompts.global))
    }

    async fn platform_prompt(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> RepurposeResult<Option<String>> {
        Ok(self
            .records
            .load(user_id)
            .await?
            .and_then(|mut prompts| prompts.platforms.remove(&platform)))
    }
}
