//! Embed normalization for rendering surfaces
//!
//! Rewrites the `src` of a snippet's iframe to the provider's canonical player
//! URL with a query string built from an [`EmbedIntent`], and guarantees the
//! lazy-loading and permission attributes. The normalizer never fails:
//! anything it cannot understand is passed through.

use crate::intent::EmbedIntent;
use crate::provider::{VideoId, VideoProvider};
use crate::snippet::EmbedMarkup;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of the `allow` attribute added when a snippet has none
pub const ALLOW_POLICY: &str =
    "autoplay; fullscreen; picture-in-picture; encrypted-media; gyroscope; accelerometer";

/// Value of the `loading` attribute added when a snippet has none
pub const LAZY_LOADING: &str = "lazy";

/// Highest quality requested from Vimeo
pub const VIMEO_QUALITY: &str = "1080p";

/// Snippet ready to be injected into a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEmbed {
    /// The rewritten markup
    pub html: String,
    /// Provider detected from the iframe source
    pub provider: VideoProvider,
    /// Video id, present only when `src` was rewritten
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<VideoId>,
}

impl NormalizedEmbed {
    /// Get the markup
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Consume into the markup
    pub fn into_html(self) -> String {
        self.html
    }

    /// Whether the iframe source was rebuilt
    pub fn is_rewritten(&self) -> bool {
        self.video_id.is_some()
    }
}

impl fmt::Display for NormalizedEmbed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

/// Normalizer bound to the origin of the page hosting the players
///
/// # Example
///
/// ```rust
/// use video_embed::{EmbedIntent, EmbedNormalizer};
///
/// let normalizer = EmbedNormalizer::new("https://lido.education");
/// let embed = normalizer.normalize(
///     r#"<iframe src="https://www.youtube.com/embed/abc123"></iframe>"#,
///     &EmbedIntent::lesson(),
/// );
/// assert!(embed.as_str().contains("controls=1"));
/// assert!(!embed.as_str().contains("autoplay=1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedNormalizer {
    page_origin: String,
}

impl EmbedNormalizer {
    /// Create a normalizer for pages served from `page_origin`
    pub fn new(page_origin: impl Into<String>) -> Self {
        Self {
            page_origin: page_origin.into(),
        }
    }

    /// The page origin passed to providers
    pub fn page_origin(&self) -> &str {
        &self.page_origin
    }

    /// Normalize a snippet for the given intent
    pub fn normalize(&self, snippet: &str, intent: &EmbedIntent) -> NormalizedEmbed {
        normalize_embed(snippet, intent, &self.page_origin)
    }

    /// Normalize for a hero/trailer background
    pub fn preview(&self, snippet: &str) -> NormalizedEmbed {
        self.normalize(snippet, &EmbedIntent::preview())
    }

    /// Normalize for the interactive lesson player
    pub fn lesson(&self, snippet: &str) -> NormalizedEmbed {
        self.normalize(snippet, &EmbedIntent::lesson())
    }
}

/// Normalize a snippet for an intent and page origin
pub fn normalize_embed(snippet: &str, intent: &EmbedIntent, page_origin: &str) -> NormalizedEmbed {
    let Some(mut markup) = EmbedMarkup::parse(snippet) else {
        tracing::debug!("no iframe element in embed snippet, passing through");
        return NormalizedEmbed {
            html: snippet.to_string(),
            provider: VideoProvider::detect(snippet),
            video_id: None,
        };
    };

    let (provider, video_id) = match markup.iframe().attribute("src") {
        Some(src) => {
            let provider = VideoProvider::detect(src);
            (provider, provider.extract_id(src))
        }
        None => (VideoProvider::Unknown, None),
    };

    match &video_id {
        Some(id) => {
            if let Some(url) = player_url(provider, id, intent, page_origin) {
                markup.iframe_mut().set_attribute("src", &url);
            }
        }
        None if provider.is_known() => {
            tracing::debug!(provider = %provider, "could not extract video id, keeping src");
        }
        None => {}
    }

    let iframe = markup.iframe_mut();
    iframe.ensure_attribute("loading", LAZY_LOADING);
    iframe.ensure_attribute("allow", ALLOW_POLICY);

    NormalizedEmbed {
        html: markup.render(),
        provider,
        video_id,
    }
}

/// Canonical player URL with the provider query for `intent`
pub fn player_url(
    provider: VideoProvider,
    id: &VideoId,
    intent: &EmbedIntent,
    page_origin: &str,
) -> Option<String> {
    let base = provider.canonical_embed_url(id)?;
    let params = match provider {
        VideoProvider::YouTube => youtube_params(id, intent, page_origin),
        VideoProvider::Vimeo => vimeo_params(intent),
        VideoProvider::Unknown => return None,
    };
    Some(format!("{}?{}", base, encode_query(&params)))
}

/// YouTube IFrame Player parameters
fn youtube_params(
    id: &VideoId,
    intent: &EmbedIntent,
    page_origin: &str,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if intent.autoplay {
        params.push(("autoplay", "1".to_string()));
    }
    if intent.effective_mute() {
        params.push(("mute", "1".to_string()));
    }
    if intent.looping {
        // Single-video loops only work when the video is its own playlist
        params.push(("loop", "1".to_string()));
        params.push(("playlist", id.to_string()));
    }
    params.push(("enablejsapi", "1".to_string()));
    params.push(("origin", page_origin.to_string()));
    params.push(("widget_referrer", page_origin.to_string()));
    params.push(("playsinline", "1".to_string()));
    params.push(("controls", flag(intent.show_controls).to_string()));
    params.push(("modestbranding", "1".to_string()));
    params.push(("rel", "0".to_string()));
    params.push(("iv_load_policy", "3".to_string()));
    if intent.background {
        params.push(("showinfo", "0".to_string()));
    }
    params
}

/// Vimeo player embed parameters
fn vimeo_params(intent: &EmbedIntent) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if intent.autoplay {
        params.push(("autoplay", "1".to_string()));
    }
    if intent.effective_mute() {
        params.push(("muted", "1".to_string()));
    }
    if intent.looping {
        params.push(("loop", "1".to_string()));
    }
    if intent.background {
        params.push(("background", "1".to_string()));
    }
    params.push(("quality", VIMEO_QUALITY.to_string()));
    params.push(("transparent", "0".to_string()));
    params.push(("playsinline", "1".to_string()));
    if !intent.background {
        params.push(("title", "0".to_string()));
        params.push(("byline", "0".to_string()));
        params.push(("portrait", "0".to_string()));
    }
    params
}

fn flag(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}

fn encode_query(params: &[(&'static str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
