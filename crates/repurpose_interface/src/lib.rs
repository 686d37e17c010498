//! Trait definitions for the repurpose content pipeline.
//!
//! Every collaborator the pipeline consumes is expressed here as an async
//! trait so backends can be swapped (durable stores in production,
//! in-memory stores and scripted generators in tests).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod storage;
mod traits;
mod types;

pub use storage::{FileStore, Record, RecordStore};
pub use traits::{ContentGenerator, DefaultPrompts, PreviewGenerator, PromptStore, VideoTranscoder};
pub use types::{ContentSource, GenerationRequest, TranscodedMedia};
