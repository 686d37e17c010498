//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the repurpose binary.

mod commands;
pub mod jobs;
pub mod prompts;

pub use commands::{Cli, Commands, OutputFormat};

use async_trait::async_trait;
use repurpose::{
    BackendError, ContentGenerator, DataStores, GenerationRequest, JobManager, JsonError,
    PlatformContent, RepurposeConfig, RepurposeResult,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Loaded configuration and the stores it points at.
pub struct Context {
    pub config: RepurposeConfig,
    pub stores: DataStores,
    pub manager: JobManager,
}

impl Context {
    /// Load configuration (an explicit file, or the layered defaults) and
    /// open the stores.
    pub fn load(config_path: Option<&Path>) -> RepurposeResult<Self> {
        let config = match config_path {
            Some(path) => RepurposeConfig::from_file(path)?,
            None => RepurposeConfig::load()?,
        };
        let stores = DataStores::open(config.storage.data_dir())?;
        let manager = stores
            .manager_builder(&config)
            .generator(Arc::new(OfflineGenerator))
            .build()?;

        Ok(Self {
            config,
            stores,
            manager,
        })
    }
}

/// Stand-in generator for a CLI that only reads the stores.
struct OfflineGenerator;

#[async_trait]
impl ContentGenerator for OfflineGenerator {
    async fn generate(&self, _request: &GenerationRequest<'_>) -> RepurposeResult<PlatformContent> {
        Err(BackendError::new("no content generator configured"))?
    }

    fn provider_name(&self) -> &str {
        "offline"
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> RepurposeResult<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
