//! Canonical target platforms and alias normalization.

use serde::{Deserialize, Serialize};

/// A canonical destination content style.
///
/// Requested targets are free-form strings; [`Platform::normalize`] maps
/// them (including aliases such as `wordpress`) onto this set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Short posts for Twitter/X
    #[display("twitter")]
    Twitter,
    /// Threads posts
    #[display("threads")]
    Threads,
    /// Bluesky posts
    #[display("bluesky")]
    Bluesky,
    /// LinkedIn posts
    #[display("linkedin")]
    Linkedin,
    /// Facebook posts
    #[display("facebook")]
    Facebook,
    /// Instagram captions
    #[display("instagram")]
    Instagram,
    /// TikTok captions and scripts
    #[display("tiktok")]
    Tiktok,
    /// YouTube descriptions
    #[display("youtube")]
    Youtube,
    /// Long-form blog articles
    #[display("blog")]
    Blog,
    /// Email newsletters
    #[display("newsletter")]
    Newsletter,
}

impl Platform {
    /// Canonical identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Threads => "threads",
            Platform::Bluesky => "bluesky",
            Platform::Linkedin => "linkedin",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Blog => "blog",
            Platform::Newsletter => "newsletter",
        }
    }

    /// Map a requested identifier onto its canonical platform.
    ///
    /// Matching ignores surrounding whitespace and ASCII case. Empty and
    /// unrecognized identifiers yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use repurpose_core::Platform;
    ///
    /// assert_eq!(Platform::normalize("wordpress"), Some(Platform::Blog));
    /// assert_eq!(Platform::normalize(" Blog "), Some(Platform::Blog));
    /// assert_eq!(Platform::normalize("X"), Some(Platform::Twitter));
    /// assert_eq!(Platform::normalize(""), None);
    /// assert_eq!(Platform::normalize("myspace"), None);
    /// ```
    pub fn normalize(id: &str) -> Option<Platform> {
        let id = id.trim().to_ascii_lowercase();
        let platform = match id.as_str() {
            "twitter" | "x" => Platform::Twitter,
            "threads" => Platform::Threads,
            "bluesky" | "bsky" => Platform::Bluesky,
            "linkedin" => Platform::Linkedin,
            "facebook" | "fb" => Platform::Facebook,
            "instagram" | "ig" => Platform::Instagram,
            "tiktok" => Platform::Tiktok,
            "youtube" => Platform::Youtube,
            "blog" | "wordpress" | "medium" => Platform::Blog,
            "newsletter" | "email" | "substack" => Platform::Newsletter,
            _ => return None,
        };
        Some(platform)
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::normalize(s).ok_or_else(|| format!("Unknown platform: {}", s))
    }
}
