//! The prompt resolver.

use crate::Resolution;
use derive_getters::Getters;
use repurpose_core::{Platform, PromptDetail, PromptSource, unique_targets};
use repurpose_interface::{DefaultPrompts, PromptStore};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The prompt resolved for one requested target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrompt {
    /// Target identifier as requested
    target: String,
    /// Resolved components and final prompt
    #[serde(flatten)]
    detail: PromptDetail,
}

/// Prompts for every recognized target, in deduplicated target order.
///
/// Unrecognized targets have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedPrompts {
    entries: Vec<ResolvedPrompt>,
}

impl ResolvedPrompts {
    /// The prompt detail for a target, as requested.
    pub fn get(&self, target: &str) -> Option<&PromptDetail> {
        self.entries
            .iter()
            .find(|entry| entry.target == target)
            .map(|entry| &entry.detail)
    }

    /// The final prompt for a target, as requested.
    pub fn final_prompt(&self, target: &str) -> Option<&str> {
        self.get(target).map(|detail| detail.final_prompt.as_str())
    }

    /// Resolved entries in target order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedPrompt> {
        self.entries.iter()
    }

    /// Number of resolved targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no target was recognized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Targets whose prompts fell back to defaults because the store failed.
    pub fn degraded_targets(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.detail.is_degraded())
            .map(|entry| entry.target.as_str())
    }
}

/// Computes the final prompt for each requested target.
///
/// Resolution only reads from the prompt store; with unchanged backing data
/// it is deterministic.
///
/// # Examples
///
/// ```
/// use repurpose_prompts::{DefaultPromptSet, PromptResolver};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let resolver = PromptResolver::new(Arc::new(
///     DefaultPromptSet::default().with_global_prompt("Be concise."),
/// ));
///
/// let custom = HashMap::from([("wordpress".to_string(), "Write a haiku".to_string())]);
/// let prompts = resolver
///     .resolve(&["blog".to_string(), "twitter".to_string()], None, &custom)
///     .await;
///
/// assert_eq!(prompts.final_prompt("blog"), Some("Write a haiku"));
/// assert!(prompts.final_prompt("twitter").unwrap().starts_with("Be concise.\n\n"));
/// # }
/// ```
#[derive(Clone)]
pub struct PromptResolver {
    defaults: Arc<dyn DefaultPrompts>,
    store: Option<Arc<dyn PromptStore>>,
}

impl PromptResolver {
    /// Create a resolver using only built-in defaults.
    pub fn new(defaults: Arc<dyn DefaultPrompts>) -> Self {
        Self {
            defaults,
            store: None,
        }
    }

    /// Add a store of user-saved prompts.
    ///
    /// Saved prompts are consulted only when a user id is supplied.
    pub fn with_store(mut self, store: Arc<dyn PromptStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Resolve prompts for `targets`.
    ///
    /// Targets are deduplicated by first occurrence. Custom prompt keys may
    /// use aliases (`wordpress` applies to a `blog` target).
    #[tracing::instrument(skip(self, targets, custom_prompts), fields(targets = targets.len()))]
    pub async fn resolve(
        &self,
        targets: &[String],
        user_id: Option<&str>,
        custom_prompts: &HashMap<String, String>,
    ) -> ResolvedPrompts {
        let custom = normalize_custom_prompts(custom_prompts);
        // Read once per call, only if some target needs it.
        let mut cached_global: Option<(String, PromptSource)> = None;
        let mut entries = Vec::new();

        for target in unique_targets(targets) {
            let Some(platform) = Platform::normalize(&target) else {
                debug!(target = %target, "Unrecognized platform, no prompt resolved");
                continue;
            };

            let detail = match custom.get(&platform) {
                Some(prompt) => PromptDetail::custom(platform, *prompt),
                None => {
                    let global = match &cached_global {
                        Some(global) => global.clone(),
                        None => {
                            let global = self.global_prompt(user_id).await;
                            cached_global = Some(global.clone());
                            global
                        }
                    };
                    let platform_prompt = self.platform_prompt(user_id, platform).await;
                    PromptDetail::combined(platform, global, platform_prompt)
                }
            };

            entries.push(ResolvedPrompt { target, detail });
        }

        ResolvedPrompts { entries }
    }

    async fn global_prompt(&self, user_id: Option<&str>) -> (String, PromptSource) {
        let saved = match (&self.store, user_id) {
            (Some(store), Some(user_id)) => {
                Some(degrade(store.global_prompt(user_id).await, "global", user_id))
            }
            _ => None,
        };
        choose(saved, || self.defaults.global_prompt())
    }

    async fn platform_prompt(
        &self,
        user_id: Option<&str>,
        platform: Platform,
    ) -> (String, PromptSource) {
        let saved = match (&self.store, user_id) {
            (Some(store), Some(user_id)) => Some(degrade(
                store.platform_prompt(user_id, platform).await,
                platform.as_str(),
                user_id,
            )),
            _ => None,
        };
        choose(saved, || self.defaults.platform_prompt(platform))
    }
}

/// Map custom prompt keys onto canonical platforms, dropping blank prompts.
///
/// When several keys name the same platform the canonical key wins, then the
/// alphabetically first alias.
fn normalize_custom_prompts(custom_prompts: &HashMap<String, String>) -> HashMap<Platform, &str> {
    let mut keys: Vec<&String> = custom_prompts.keys().collect();
    keys.sort();

    let mut normalized = HashMap::new();
    for key in keys {
        let prompt = custom_prompts[key].as_str();
        if prompt.trim().is_empty() {
            continue;
        }
        let Some(platform) = Platform::normalize(key) else {
            continue;
        };
        if key.as_str() == platform.as_str() || !normalized.contains_key(&platform) {
            normalized.insert(platform, prompt);
        }
    }
    normalized
}

/// Treat a prompt store failure as "nothing saved", keeping the reason.
fn degrade(
    read: repurpose_error::RepurposeResult<Option<String>>,
    prompt: &str,
    user_id: &str,
) -> Resolution<Option<String>> {
    match read {
        Ok(saved) => Resolution::Ok(saved),
        Err(e) => {
            let reason = e.reason();
            warn!(user_id, prompt, reason = %reason, "Prompt store read failed, using default");
            Resolution::Degraded {
                value: None,
                reason,
            }
        }
    }
}

/// Pick the saved prompt when it is non-blank, the default otherwise.
fn choose(
    saved: Option<Resolution<Option<String>>>,
    default: impl FnOnce() -> String,
) -> (String, PromptSource) {
    let Some(read) = saved else {
        return (default(), PromptSource::Default);
    };
    if let Some(reason) = read.reason() {
        return (default(), PromptSource::Fallback(reason.to_string()));
    }
    match read.into_value() {
        Some(prompt) if !prompt.trim().is_empty() => (prompt, PromptSource::Saved),
        _ => (default(), PromptSource::Default),
    }
}
