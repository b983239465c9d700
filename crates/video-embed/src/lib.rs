//! Third-party video embeds for Lido
//!
//! Course creators paste YouTube or Vimeo `<iframe>` snippets. This crate
//! decides whether a pasted snippet is acceptable ([`validator`]) and rewrites
//! stored snippets for the surface that renders them ([`normalizer`]).
//!
//! # Example
//!
//! ```rust
//! use video_embed::{is_valid_embed, EmbedNormalizer};
//!
//! let snippet = r#"<iframe src="https://player.vimeo.com/video/824804225"></iframe>"#;
//! assert!(is_valid_embed(snippet));
//!
//! let normalizer = EmbedNormalizer::new("https://lido.education");
//! let hero = normalizer.preview(snippet);
//! assert!(hero.as_str().contains("background=1"));
//! assert!(hero.as_str().contains(r#"loading="lazy""#));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod intent;
pub mod normalizer;
pub mod provider;
pub mod snippet;
pub mod validator;

pub use intent::EmbedIntent;
pub use normalizer::{normalize_embed, EmbedNormalizer, NormalizedEmbed, ALLOW_POLICY};
pub use provider::{detect_video, VideoId, VideoProvider};
pub use snippet::{EmbedMarkup, IframeElement};
pub use validator::{check_embed, is_valid_embed, EmbedRejection, EmbedStatus};
