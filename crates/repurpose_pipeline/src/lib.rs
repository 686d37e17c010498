//! Job orchestration for the repurpose content pipeline.
//!
//! [`JobManager`] ties the pieces together:
//!
//! ```text
//! create_jobs ──► JobRepository (pending) + ProcessRequest
//!                    │
//! process_job ──► processing ──► PromptResolver ──► GenerationDispatcher
//!                                                      │
//!                    completed ◄── JobResults ◄────────┘
//!                        │
//!                        └──► MetadataComposer (best-effort)
//! ```
//!
//! Pipeline faults (missing request, missing stored file, no targets) move a
//! job to `failed`. Individual platform failures do not: they are recorded
//! in that platform's result and the job still completes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod composer;
mod config;
mod dispatcher;
mod manager;
mod repository;

pub use composer::MetadataComposer;
pub use config::{PipelineConfig, RepurposeConfig, StorageConfig};
pub use dispatcher::GenerationDispatcher;
pub use manager::{JobManager, JobManagerBuilder};
pub use repository::JobRepository;

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
