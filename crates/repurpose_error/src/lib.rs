//! Error types for the repurpose content pipeline.
//!
//! This crate provides the foundation error types used throughout the workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind (or a message) with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! `RepurposeError::reason` strips the location so the bare message can be
//! shown to users and persisted on jobs.
//!
//! # Examples
//!
//! ```
//! use repurpose_error::{RepurposeResult, GenerationError};
//!
//! fn generate() -> RepurposeResult<String> {
//!     Err(GenerationError::new("quota exceeded"))?
//! }
//!
//! let err = generate().unwrap_err();
//! assert_eq!(err.reason(), "quota exceeded");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod builder;
mod config;
mod error;
mod generation;
mod job;
mod json;
mod prompt;
mod storage;

pub use backend::BackendError;
pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{RepurposeError, RepurposeErrorKind, RepurposeResult};
pub use generation::GenerationError;
pub use job::{JobError, JobErrorKind};
pub use json::JsonError;
pub use prompt::PromptError;
pub use storage::{StorageError, StorageErrorKind};
