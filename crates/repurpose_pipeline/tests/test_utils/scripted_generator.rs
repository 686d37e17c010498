//! Content generator with per-target scripted behavior.

use async_trait::async_trait;
use repurpose_core::{Platform, PlatformContent};
use repurpose_error::{GenerationError, RepurposeResult};
use repurpose_interface::{ContentGenerator, GenerationRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What a scripted call does once its delay has elapsed.
#[derive(Debug, Clone, Default)]
pub enum Outcome {
    /// Return content derived from the target and prompt
    #[default]
    Succeed,
    /// Return a generation error with this message
    Fail(String),
    /// Panic with this message
    Panic(String),
}

#[derive(Debug, Clone, Default)]
struct Script {
    delay: Duration,
    outcome: Outcome,
}

/// One observed generator call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub target: String,
    pub platform: Option<Platform>,
    pub prompt: Option<String>,
    pub source_text: Option<String>,
    pub media_bytes: Option<usize>,
}

/// Generator whose behavior is scripted per target.
///
/// Unscripted targets succeed immediately.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, target: &str, message: &str) -> Self {
        self.scripts.entry(target.to_string()).or_default().outcome =
            Outcome::Fail(message.to_string());
        self
    }

    pub fn panic(mut self, target: &str, message: &str) -> Self {
        self.scripts.entry(target.to_string()).or_default().outcome =
            Outcome::Panic(message.to_string());
        self
    }

    pub fn delay(mut self, target: &str, delay: Duration) -> Self {
        self.scripts.entry(target.to_string()).or_default().delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_for(&self, target: &str) -> Option<RecordedCall> {
        self.calls().into_iter().find(|call| call.target == target)
    }

    /// Body produced for a successful target.
    pub fn body_for(target: &str) -> String {
        format!("{} post", target)
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> RepurposeResult<PlatformContent> {
        self.calls.lock().unwrap().push(RecordedCall {
            target: request.target.to_string(),
            platform: request.platform,
            prompt: request.prompt.map(str::to_string),
            source_text: request.source.text().map(str::to_string),
            media_bytes: match request.source {
                repurpose_interface::ContentSource::Media { bytes, .. } => Some(bytes.len()),
                repurpose_interface::ContentSource::Text(_) => None,
            },
        });

        let script = self.scripts.get(request.target).cloned().unwrap_or_default();
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        match script.outcome {
            Outcome::Succeed => Ok(PlatformContent::new(Self::body_for(request.target))),
            Outcome::Fail(message) => Err(GenerationError::new(message))?,
            Outcome::Panic(message) => panic!("{}", message),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}
