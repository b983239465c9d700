//! Lido course platform client
//!
//! Facade over the workspace crates:
//! - [`embed`]: validation and normalization of YouTube/Vimeo embed snippets
//! - [`session`]: session and profile state
//! - [`app`]: configuration, courses, the course editor, the detail page and the lesson player
//! - [`ui`]: routes and the route guard
//!
//! # Example
//!
//! ```
//! use lido::embed::EmbedNormalizer;
//!
//! let normalizer = EmbedNormalizer::new("https://lido.education");
//! let embed = normalizer.preview(
//!     r#"<iframe src="https://player.vimeo.com/video/76979871"></iframe>"#,
//! );
//! assert!(embed.as_str().contains("background=1"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod telemetry;

pub use app_core as app;
pub use app_state as session;
pub use app_ui as ui;
pub use video_embed as embed;

pub use telemetry::init_tracing;
