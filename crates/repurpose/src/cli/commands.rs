//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Repurpose - turn one piece of content into posts for many platforms
#[derive(Parser, Debug)]
#[command(name = "repurpose")]
#[command(about = "Inspect prompts, jobs and content history of the repurpose pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (replaces ~/.config and ./repurpose.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show how prompts resolve for a set of platforms
    Prompts {
        /// Target platforms, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        targets: Vec<String>,

        /// Resolve with this user's saved prompts
        #[arg(long)]
        user: Option<String>,

        /// Custom prompt for one platform, as platform=prompt (repeatable)
        #[arg(long, value_parser = parse_custom_prompt)]
        custom: Vec<(String, String)>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Save a user's global prompt, or a platform prompt with --platform
    SavePrompt {
        /// User the prompt belongs to
        #[arg(long)]
        user: String,

        /// Platform the prompt applies to; the global prompt when omitted
        #[arg(long)]
        platform: Option<String>,

        /// Prompt text; clears the saved prompt when omitted
        prompt: Option<String>,
    },

    /// Show a job's status
    Status {
        /// Job id
        job_id: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Show a completed job's per-platform results
    Results {
        /// Job id
        job_id: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// List content history, most recent first
    History {
        /// Only this user's records
        #[arg(long)]
        user: Option<String>,

        /// Maximum number of records (configured page size when omitted)
        #[arg(long)]
        limit: Option<usize>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

fn parse_custom_prompt(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((platform, prompt)) if !platform.trim().is_empty() => {
            Ok((platform.trim().to_string(), prompt.to_string()))
        }
        _ => Err(format!("expected platform=prompt, got '{}'", value)),
    }
}
