//! Video provider detection and video id extraction
//!
//! Providers are recognised by the host/path marker of their player endpoint.
//! Nothing here fails loudly: an unrecognised URL is [`VideoProvider::Unknown`]
//! and an unusable id is simply `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker identifying a YouTube embed player URL
pub const YOUTUBE_EMBED_MARKER: &str = "youtube.com/embed/";

/// Marker identifying a Vimeo player URL
pub const VIMEO_PLAYER_MARKER: &str = "player.vimeo.com/video/";

/// Third-party video host behind an embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    /// YouTube IFrame player
    YouTube,
    /// Vimeo player
    Vimeo,
    /// Anything else
    Unknown,
}

impl VideoProvider {
    /// Get the provider as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoProvider::YouTube => "youtube",
            VideoProvider::Vimeo => "vimeo",
            VideoProvider::Unknown => "unknown",
        }
    }

    /// Detect the provider from a URL or a whole snippet
    ///
    /// The YouTube marker is checked first; a snippet is only ever expected to
    /// match one provider.
    pub fn detect(text: &str) -> Self {
        if find_marker(text, YOUTUBE_EMBED_MARKER).is_some() {
            VideoProvider::YouTube
        } else if find_marker(text, VIMEO_PLAYER_MARKER).is_some() {
            VideoProvider::Vimeo
        } else {
            VideoProvider::Unknown
        }
    }

    /// The marker that precedes the video id for this provider
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            VideoProvider::YouTube => Some(YOUTUBE_EMBED_MARKER),
            VideoProvider::Vimeo => Some(VIMEO_PLAYER_MARKER),
            VideoProvider::Unknown => None,
        }
    }

    /// Extract this provider's video id from `text`
    ///
    /// Takes everything after the provider marker and cuts it at the first
    /// quote, `?`, whitespace, `>` or `/`.
    pub fn extract_id(&self, text: &str) -> Option<VideoId> {
        let marker = self.marker()?;
        let start = find_marker(text, marker)? + marker.len();
        let remainder = &text[start..];
        let end = remainder
            .find(|c: char| matches!(c, '"' | '?' | '>' | '/') || c.is_whitespace())
            .unwrap_or(remainder.len());
        VideoId::new(remainder[..end].trim())
    }

    /// Canonical player URL for a video, without any query string
    pub fn canonical_embed_url(&self, id: &VideoId) -> Option<String> {
        match self {
            VideoProvider::YouTube => Some(format!("https://www.youtube.com/embed/{}", id)),
            VideoProvider::Vimeo => Some(format!("https://player.vimeo.com/video/{}", id)),
            VideoProvider::Unknown => None,
        }
    }

    /// Check if this is a known provider
    pub fn is_known(&self) -> bool {
        !matches!(self, VideoProvider::Unknown)
    }
}

impl fmt::Display for VideoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect a provider and extract its id in one step
pub fn detect_video(text: &str) -> (VideoProvider, Option<VideoId>) {
    let provider = VideoProvider::detect(text);
    let id = provider.extract_id(text);
    (provider, id)
}

/// Provider-specific video identifier
///
/// Always non-empty and free of query-string, fragment, path-separator and
/// markup characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Create a video id, rejecting empty or unsafe tokens
    pub fn new(token: &str) -> Option<Self> {
        let is_valid = !token.is_empty()
            && !token.chars().any(|c| {
                matches!(c, '?' | '#' | '&' | '/' | '"' | '\'' | '<' | '>') || c.is_whitespace()
            });
        is_valid.then(|| Self(token.to_string()))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        VideoId::new(&value).ok_or_else(|| format!("invalid video id: {:?}", value))
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// Byte offset of `marker` in `text`, ignoring ASCII case
///
/// ASCII lowercasing keeps byte offsets stable, so the offset is valid for the
/// original text.
fn find_marker(text: &str, marker: &str) -> Option<usize> {
    text.to_ascii_lowercase().find(marker)
}
