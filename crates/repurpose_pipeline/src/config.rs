//! Configuration for the repurpose pipeline.
//!
//! Configuration is layered, later sources taking precedence:
//! - Bundled defaults (include_str! from repurpose.toml)
//! - `~/.config/repurpose/repurpose.toml`
//! - `./repurpose.toml`
//! - `REPURPOSE__*` environment variables (`__` separates sections)

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use repurpose_error::{ConfigError, RepurposeResult};
use repurpose_prompts::DefaultPromptSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../repurpose.toml");

/// Where durable records and uploaded files are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// The effective data directory.
    ///
    /// Falls back to `{platform data dir}/repurpose`, then `./.repurpose`.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("repurpose"))
                .unwrap_or_else(|| PathBuf::from(".repurpose"))
        })
    }
}

fn default_history_limit() -> usize {
    20
}

/// Orchestration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Content history page size when the caller gives no limit
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Bound on a single platform's generation call, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_timeout_secs: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            generation_timeout_secs: None,
        }
    }
}

impl PipelineConfig {
    /// The generation timeout, when one is configured.
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_secs.map(Duration::from_secs)
    }
}

/// Complete repurpose configuration.
///
/// # Example
///
/// ```toml
/// [storage]
/// data_dir = "/var/lib/repurpose"
///
/// [pipeline]
/// history_limit = 50
/// generation_timeout_secs = 120
///
/// [prompts]
/// global = "You write for a developer audience."
///
/// [prompts.platforms]
/// wordpress = "Write a tutorial-style article."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepurposeConfig {
    /// Storage locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Orchestration settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Built-in default prompts
    #[serde(default)]
    pub prompts: DefaultPromptSet,
}

impl RepurposeConfig {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed.
    #[instrument]
    pub fn load() -> RepurposeResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/repurpose/repurpose.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("repurpose").required(false));

        Self::finish(builder)
    }

    /// Load configuration from one explicit file over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> RepurposeResult<Self> {
        let builder = Self::defaults().add_source(File::from(path.as_ref()).required(true));
        Self::finish(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> RepurposeResult<Self> {
        let config = builder
            .add_source(Environment::with_prefix("REPURPOSE").separator("__"))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }
}
