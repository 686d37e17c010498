//! Resolved prompt types.

use crate::Platform;
use serde::{Deserialize, Serialize};

/// Where one component of a resolved prompt came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "reason")]
pub enum PromptSource {
    /// Superseded by a caller-supplied custom prompt
    Custom,
    /// The user's saved prompt
    Saved,
    /// Built-in default; no saved prompt exists
    Default,
    /// Built-in default used because the prompt store failed
    Fallback(String),
}

impl PromptSource {
    /// Whether this component was resolved in degraded mode.
    pub fn is_fallback(&self) -> bool {
        matches!(self, PromptSource::Fallback(_))
    }
}

/// The resolved prompt components and final prompt for one target.
///
/// Either `final_prompt == custom_prompt` (when a non-blank custom prompt
/// was supplied), or
/// `final_prompt == combined_prompt == global_character_prompt + "\n\n" + platform_prompt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDetail {
    /// Canonical platform the target resolved to
    pub normalized_platform: Platform,
    /// Global character prompt (empty when a custom prompt was used)
    pub global_character_prompt: String,
    /// Platform prompt (empty when a custom prompt was used)
    pub platform_prompt: String,
    /// Concatenation of the two, or the custom prompt
    pub combined_prompt: String,
    /// Caller-supplied prompt, verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    /// Exactly the string handed to the content generator
    pub final_prompt: String,
    /// Provenance of `global_character_prompt`
    pub global_source: PromptSource,
    /// Provenance of `platform_prompt`
    pub platform_source: PromptSource,
}

impl PromptDetail {
    /// Detail for a target whose custom prompt replaces resolution entirely.
    pub fn custom(platform: Platform, custom_prompt: impl Into<String>) -> Self {
        let custom_prompt = custom_prompt.into();
        Self {
            normalized_platform: platform,
            global_character_prompt: String::new(),
            platform_prompt: String::new(),
            combined_prompt: custom_prompt.clone(),
            final_prompt: custom_prompt.clone(),
            custom_prompt: Some(custom_prompt),
            global_source: PromptSource::Custom,
            platform_source: PromptSource::Custom,
        }
    }

    /// Detail combining a global character prompt with a platform prompt.
    ///
    /// # Examples
    ///
    /// ```
    /// use repurpose_core::{Platform, PromptDetail, PromptSource};
    ///
    /// let detail = PromptDetail::combined(
    ///     Platform::Twitter,
    ///     ("Be witty.".to_string(), PromptSource::Default),
    ///     ("Stay under 280 characters.".to_string(), PromptSource::Saved),
    /// );
    /// assert_eq!(detail.final_prompt, "Be witty.\n\nStay under 280 characters.");
    /// assert_eq!(detail.final_prompt, detail.combined_prompt);
    /// ```
    pub fn combined(
        platform: Platform,
        global: (String, PromptSource),
        platform_prompt: (String, PromptSource),
    ) -> Self {
        let (global_character_prompt, global_source) = global;
        let (platform_prompt, platform_source) = platform_prompt;
        let combined_prompt = format!("{}\n\n{}", global_character_prompt, platform_prompt);
        Self {
            normalized_platform: platform,
            global_character_prompt,
            platform_prompt,
            final_prompt: combined_prompt.clone(),
            combined_prompt,
            custom_prompt: None,
            global_source,
            platform_source,
        }
    }

    /// Whether any component fell back to defaults because of a store failure.
    pub fn is_degraded(&self) -> bool {
        self.global_source.is_fallback() || self.platform_source.is_fallback()
    }
}

/// Prompts one user has saved.
///
/// Blank entries count as "nothing saved".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrompts {
    /// Owner of the prompts
    pub user_id: String,
    /// Saved global character prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<String>,
    /// Saved platform prompts keyed by canonical platform
    #[serde(default)]
    pub platforms: std::collections::BTreeMap<Platform, String>,
}

impl UserPrompts {
    /// An empty prompt set for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}
