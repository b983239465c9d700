//! Playback intent requested by a rendering surface

use serde::{Deserialize, Serialize};

/// How an embed should behave once rendered
///
/// The intent belongs to the calling surface, never to the snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedIntent {
    /// Start playing as soon as the player loads
    pub autoplay: bool,
    /// Start with sound off
    pub muted: bool,
    /// Restart when the video ends
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Show the provider's native controls
    pub show_controls: bool,
    /// Chrome-free background playback
    pub background: bool,
}

impl EmbedIntent {
    /// Hero/trailer surface: autoplaying, muted, looping, no chrome
    pub const fn preview() -> Self {
        Self {
            autoplay: true,
            muted: true,
            looping: true,
            show_controls: false,
            background: true,
        }
    }

    /// Lesson player: the learner starts playback and controls sound
    pub const fn lesson() -> Self {
        Self {
            autoplay: false,
            muted: false,
            looping: false,
            show_controls: true,
            background: false,
        }
    }

    /// Whether the player must start muted
    ///
    /// Browsers block unmuted autoplay, so a background surface that autoplays
    /// is always muted regardless of `muted`.
    pub fn effective_mute(&self) -> bool {
        self.muted || (self.autoplay && self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_intent() {
        let intent = EmbedIntent::preview();
        assert!(intent.autoplay && intent.muted && intent.looping && intent.background);
        assert!(!intent.show_controls);
    }

    #[test]
    fn test_lesson_intent() {
        let intent = EmbedIntent::lesson();
        assert!(!intent.autoplay && !intent.muted && !intent.looping && !intent.background);
        assert!(intent.show_controls);
    }

    #[test]
    fn test_background_autoplay_forces_mute() {
        let intent = EmbedIntent {
            muted: false,
            ..EmbedIntent::preview()
        };
        assert!(intent.effective_mute());

        let interactive = EmbedIntent {
            autoplay: true,
            ..EmbedIntent::lesson()
        };
        assert!(!interactive.effective_mute());
    }

    #[test]
    fn test_intent_serialization() {
        let json = serde_json::to_string(&EmbedIntent::preview()).unwrap();
        assert!(json.contains("\"loop\":true"));
        assert!(json.contains("\"showControls\":false"));

        let parsed: EmbedIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EmbedIntent::preview());
    }
}
