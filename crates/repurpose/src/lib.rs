//! Repurpose - one source, many platforms.
//!
//! Repurpose takes a piece of source content (text, audio or video) and
//! produces platform-specific posts for several social platforms at once.
//! Each submission becomes one job; every requested platform gets exactly one
//! generation attempt, all running concurrently, and one platform failing
//! never fails the others.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use repurpose::{DataStores, JobSubmission, RepurposeConfig, SourceType};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RepurposeConfig::load()?;
//!     let stores = DataStores::open(config.storage.data_dir())?;
//!     let manager = stores
//!         .manager_builder(&config)
//!         .generator(Arc::new(MyGenerator::new()))
//!         .build()?;
//!
//!     let submission = JobSubmission::builder()
//!         .source_type(SourceType::Text)
//!         .content("We shipped v2 today!")
//!         .targets(vec!["twitter".into(), "linkedin".into()])
//!         .build()?;
//!
//!     let (handles, task) = manager.submit(submission).await?;
//!     let job = repurpose::JobManager::join(task).await?;
//!     println!("{} finished as {}", job.id, job.status);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `repurpose_error` - Error types
//! - `repurpose_core` - Data model (jobs, requests, results, history)
//! - `repurpose_interface` - Collaborator traits (generator, stores, media)
//! - `repurpose_storage` - File and record store backends
//! - `repurpose_prompts` - Three-tier prompt resolution
//! - `repurpose_pipeline` - Job lifecycle, dispatch and history
//!
//! This crate re-exports everything for convenience.

pub use repurpose_core::*;
pub use repurpose_error::*;
pub use repurpose_interface::*;
pub use repurpose_pipeline::*;
pub use repurpose_prompts::*;
pub use repurpose_storage::{
    FileSystemFileStore, InMemoryFileStore, InMemoryRecordStore, JsonRecordStore,
};

mod stores;
mod telemetry;

pub use stores::DataStores;
pub use telemetry::init_logging;
