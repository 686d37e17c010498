//! Built-in default prompts.

use repurpose_core::Platform;
use repurpose_interface::DefaultPrompts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const GLOBAL_PROMPT: &str = "You are a skilled content strategist who repurposes source material \
for different platforms. Keep the author's voice and key ideas, never invent facts that are not \
in the source, and adapt length, structure and tone to the platform you are writing for.";

/// Built-in prompt for each canonical platform.
fn builtin_platform_prompt(platform: Platform) -> &'static str {
    match platform {
        Platform::Twitter => {
            "Write a single post for Twitter/X of at most 280 characters. Lead with a hook, \
             keep one idea per post, and add at most two relevant hashtags."
        }
        Platform::Threads => {
            "Write a conversational Threads post of at most 500 characters that invites replies."
        }
        Platform::Bluesky => {
            "Write a Bluesky post of at most 300 characters. Plain, direct and free of hashtag spam."
        }
        Platform::Linkedin => {
            "Write a LinkedIn post for a professional audience. Open with a one-line insight, \
             use short paragraphs, and close with a question or call to action."
        }
        Platform::Facebook => {
            "Write a friendly Facebook post that tells a short story and encourages comments."
        }
        Platform::Instagram => {
            "Write an Instagram caption. Start with a strong first line, keep it skimmable, \
             and finish with up to ten relevant hashtags."
        }
        Platform::Tiktok => {
            "Write a TikTok video script of under 60 seconds with a hook in the first three \
             seconds, followed by a short caption."
        }
        Platform::Youtube => {
            "Write a YouTube video title and description with a two-sentence summary, \
             key takeaways as a list, and a subscribe call to action."
        }
        Platform::Blog => {
            "Write a long-form blog article with a title, an introduction, descriptive \
             section headings, and a conclusion. Use Markdown."
        }
        Platform::Newsletter => {
            "Write an email newsletter issue with a subject line, a personal greeting, \
             the main story in a few short sections, and a clear sign-off."
        }
    }
}

/// The built-in prompts used when a user has saved none.
///
/// Every field can be overridden from configuration; platforms without a
/// configured (non-blank) prompt use the built-in one. Platform keys accept
/// aliases.
///
/// # Examples
///
/// ```
/// use repurpose_core::Platform;
/// use repurpose_interface::DefaultPrompts;
/// use repurpose_prompts::DefaultPromptSet;
///
/// let defaults = DefaultPromptSet::default()
///     .with_platform_prompt("wordpress", "Write a blog post.");
///
/// assert_eq!(defaults.platform_prompt(Platform::Blog), "Write a blog post.");
/// assert!(!defaults.platform_prompt(Platform::Twitter).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPromptSet {
    /// Global character prompt
    global: String,
    /// Platform prompts keyed by platform name or alias
    platforms: BTreeMap<String, String>,
}

impl Default for DefaultPromptSet {
    fn default() -> Self {
        Self {
            global: GLOBAL_PROMPT.to_string(),
            platforms: BTreeMap::new(),
        }
    }
}

impl DefaultPromptSet {
    /// Replace the global character prompt.
    pub fn with_global_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.global = prompt.into();
        self
    }

    /// Override the prompt for one platform (name or alias).
    pub fn with_platform_prompt(
        mut self,
        platform: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        self.platforms.insert(platform.into(), prompt.into());
        self
    }

    /// Configured override for a platform, preferring the canonical key over aliases.
    fn configured(&self, platform: Platform) -> Option<&str> {
        let usable = |prompt: &&String| !prompt.trim().is_empty();

        self.platforms
            .get(platform.as_str())
            .filter(usable)
            .or_else(|| {
                self.platforms
                    .iter()
                    .filter(|(key, _)| Platform::normalize(key) == Some(platform))
                    .map(|(_, prompt)| prompt)
                    .find(usable)
            })
            .map(String::as_str)
    }
}

impl DefaultPrompts for DefaultPromptSet {
    fn global_prompt(&self) -> String {
        if self.global.trim().is_empty() {
            GLOBAL_PROMPT.to_string()
        } else {
            self.global.clone()
        }
    }

    fn platform_prompt(&self, platform: Platform) -> String {
        self.configured(platform)
            .unwrap_or_else(|| builtin_platform_prompt(platform))
            .to_string()
    }
}
