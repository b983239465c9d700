//! Authoring-time acceptance check for pasted embed snippets
//!
//! The check is deliberately marker-based: it looks for the iframe tags, a
//! `src=` attribute and a supported player host anywhere in the text, without
//! requiring that they belong to the same element.

use crate::provider::VideoProvider;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a snippet is refused by the course editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmbedRejection {
    /// Nothing was pasted
    #[error("Embed code is empty")]
    Empty,

    /// No `<iframe ...></iframe>` pair
    #[error("Embed code must be an <iframe> element")]
    MissingIframe,

    /// No `src=` attribute
    #[error("Embed code has no src attribute")]
    MissingSrc,

    /// The player host is neither YouTube nor Vimeo
    #[error("Embed must point at a YouTube or Vimeo player")]
    UnsupportedHost,
}

/// Result type for embed checks
pub type Result<T> = std::result::Result<T, EmbedRejection>;

/// Check a snippet and report which provider it targets
pub fn check_embed(snippet: &str) -> Result<VideoProvider> {
    if snippet.is_empty() {
        return Err(EmbedRejection::Empty);
    }

    let lower = snippet.to_lowercase();
    if !(lower.contains("<iframe") && lower.contains("</iframe>")) {
        return Err(EmbedRejection::MissingIframe);
    }
    if !lower.contains("src=") {
        return Err(EmbedRejection::MissingSrc);
    }

    match VideoProvider::detect(&lower) {
        VideoProvider::Unknown => Err(EmbedRejection::UnsupportedHost),
        provider => Ok(provider),
    }
}

/// Accept or reject a pasted snippet
pub fn is_valid_embed(snippet: &str) -> bool {
    check_embed(snippet).is_ok()
}

/// Badge state for an embed field in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedStatus {
    /// Field left blank; no badge is shown
    Empty,
    /// Snippet accepted
    Valid,
    /// Snippet refused
    Invalid,
}

impl EmbedStatus {
    /// Compute the badge state for a field value
    pub fn of(snippet: &str) -> Self {
        if snippet.trim().is_empty() {
            EmbedStatus::Empty
        } else if is_valid_embed(snippet) {
            EmbedStatus::Valid
        } else {
            EmbedStatus::Invalid
        }
    }

    /// Whether saving may proceed with this field
    pub fn allows_save(&self) -> bool {
        !matches!(self, EmbedStatus::Invalid)
    }
}
