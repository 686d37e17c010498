//! Core data types for the repurpose content pipeline.
//!
//! This crate provides the records shared by every layer: jobs and their
//! state machine, submissions and persisted requests, resolved prompts,
//! per-platform results, and history records.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod file;
mod job;
mod metadata;
mod platform;
mod prompt;
mod request;
mod result;
mod source;

pub use file::{StoredFile, Upload};
pub use job::{Job, JobHandle, JobStatus, unique_targets};
pub use metadata::{ContentMetadata, GeneratedContent, PreviewData};
pub use platform::Platform;
pub use prompt::{PromptDetail, PromptSource, UserPrompts};
pub use request::{ContentProfile, JobSubmission, JobSubmissionBuilder, ProcessRequest};
pub use result::{JobResults, PlatformContent, PlatformResult};
pub use source::SourceType;
