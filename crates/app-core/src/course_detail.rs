//! Course detail page model

use crate::courses::Course;
use video_embed::{EmbedNormalizer, NormalizedEmbed};

/// Data behind the course detail page
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDetail {
    course: Course,
}

impl CourseDetail {
    /// Wrap a loaded course
    pub fn new(course: Course) -> Self {
        Self { course }
    }

    /// The course shown
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Preview video for the page hero, set up for muted looping background playback
    ///
    /// Returns `None` when the course has no preview, in which case the page
    /// shows its static backdrop.
    pub fn hero_embed(&self, normalizer: &EmbedNormalizer) -> Option<NormalizedEmbed> {
        self.course
            .preview_embed()
            .map(|snippet| normalizer.preview(snippet))
    }

    /// Number of modules listed in the curriculum
    pub fn module_count(&self) -> usize {
        self.course.modules.len()
    }

    /// Number of lessons listed in the curriculum
    pub fn lesson_count(&self) -> usize {
        self.course.lesson_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::courses::{CourseModule, Lesson};
    use video_embed::VideoProvider;

    fn course(preview: Option<&str>) -> Course {
        let mut module = CourseModule::new("m1", "Intro");
        module.lessons.push(Lesson::new("l1", "Welcome", "02:15"));
        Course {
            id: "c1".to_string(),
            title: "Design Systems".to_string(),
            price: 0.0,
            category: "Design System".to_string(),
            image_url: String::new(),
            preview_embed_code: preview.map(str::to_string),
            modules: vec![module],
            creator_id: "u1".to_string(),
            back_gradient: None,
            back_icon: None,
        }
    }

    #[test]
    fn test_hero_embed_plays_in_background() {
        let detail = CourseDetail::new(course(Some(
            r#"<iframe src="https://player.vimeo.com/video/824804225?h=1"></iframe>"#,
        )));
        let normalizer = EmbedNormalizer::new("https://lido.education");

        let embed = detail.hero_embed(&normalizer).unwrap();
        assert_eq!(embed.provider, VideoProvider::Vimeo);
        assert!(embed.as_str().contains(
            "https://player.vimeo.com/video/824804225?autoplay=1&muted=1&loop=1&background=1&quality=1080p&transparent=0&playsinline=1"
        ));
    }

    #[test]
    fn test_hero_embed_absent_without_preview() {
        let normalizer = EmbedNormalizer::new("https://lido.education");
        assert!(CourseDetail::new(course(None)).hero_embed(&normalizer).is_none());
        assert!(CourseDetail::new(course(Some("   ")))
            .hero_embed(&normalizer)
            .is_none());
    }

    #[test]
    fn test_curriculum_counts() {
        let detail = CourseDetail::new(course(None));
        assert_eq!(detail.module_count(), 1);
        assert_eq!(detail.lesson_count(), 1);
    }
}
