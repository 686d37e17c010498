//! Prompt resolution for the repurpose content pipeline.
//!
//! For every requested target the resolver computes exactly the prompt
//! string handed to the content generator:
//!
//! 1. A non-blank custom prompt for the target's platform is used verbatim.
//! 2. Otherwise the global character prompt and the platform prompt are
//!    joined with a blank line, each taken from the user's saved prompts
//!    when present and from the built-in defaults otherwise.
//!
//! Prompt store failures never fail resolution. They degrade to defaults and
//! are recorded as [`PromptSource::Fallback`](repurpose_core::PromptSource).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod defaults;
mod resolution;
mod resolver;
mod store;

pub use defaults::DefaultPromptSet;
pub use resolution::Resolution;
pub use resolver::{PromptResolver, ResolvedPrompt, ResolvedPrompts};
pub use store::RecordPromptStore;
