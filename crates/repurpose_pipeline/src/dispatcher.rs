//! Concurrent per-platform generation with failure isolation.

use futures::FutureExt;
use futures::future::join_all;
use repurpose_core::{ContentProfile, Platform, PlatformResult, unique_targets};
use repurpose_interface::{ContentGenerator, ContentSource, GenerationRequest};
use repurpose_prompts::ResolvedPrompts;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs one generation call per target and collects index-aligned results.
///
/// Every target gets exactly one attempt. All calls run concurrently and the
/// dispatcher waits for every one to settle; a failure, panic or slow call
/// for one target never affects another's result. Results come back in
/// target order, not completion order.
#[derive(Clone)]
pub struct GenerationDispatcher {
    generator: Arc<dyn ContentGenerator>,
    timeout: Option<Duration>,
}

impl GenerationDispatcher {
    /// Create a dispatcher with no per-call time limit.
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            timeout: None,
        }
    }

    /// Bound each generation call. An expired call becomes that target's failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate content for every target.
    ///
    /// Targets are deduplicated by first occurrence; the result list has one
    /// entry per remaining target, in order. Targets without a resolved
    /// prompt are still attempted, with no prompt.
    #[tracing::instrument(
        skip_all,
        fields(
            provider = self.generator.provider_name(),
            source_type = %source.source_type(),
            targets = targets.len()
        )
    )]
    pub async fn dispatch(
        &self,
        source: &ContentSource,
        targets: &[String],
        profile: &ContentProfile,
        prompts: &ResolvedPrompts,
    ) -> Vec<PlatformResult> {
        let targets = unique_targets(targets);

        let calls = targets.iter().map(|target| {
            let request = GenerationRequest {
                source,
                target,
                platform: Platform::normalize(target),
                profile,
                prompt: prompts.final_prompt(target),
            };
            self.generate_one(request)
        });

        let results = join_all(calls).await;

        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            succeeded,
            failed = results.len() - succeeded,
            "Generation dispatch settled"
        );
        results
    }

    async fn generate_one(&self, request: GenerationRequest<'_>) -> PlatformResult {
        let target = request.target;
        if request.prompt.is_none() {
            debug!(platform = %target, "Dispatching without a resolved prompt");
        }

        let call = AssertUnwindSafe(self.generator.generate(&request)).catch_unwind();
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let reason = format!("generation timed out after {}s", limit.as_secs());
                    warn!(platform = %target, reason = %reason, "Generation failed");
                    return PlatformResult::failed(target, reason);
                }
            },
            None => call.await,
        };

        match outcome {
            Ok(Ok(content)) => {
                debug!(platform = %target, "Generation succeeded");
                PlatformResult::succeeded(target, content)
            }
            Ok(Err(e)) => {
                let reason = e.reason();
                warn!(platform = %target, reason = %reason, "Generation failed");
                PlatformResult::failed(target, reason)
            }
            Err(panic) => {
                let reason = format!("generator panicked: {}", crate::panic_message(&*panic));
                warn!(platform = %target, reason = %reason, "Generation failed");
                PlatformResult::failed(target, reason)
            }
        }
    }
}
