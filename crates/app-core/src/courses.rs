//! Course records and the course editor
//!
//! A course is a list of modules, each holding lessons whose `video_src` is a
//! provider embed snippet. [`CourseDraft`] is the editor state: it is edited
//! in place and only turned into a [`Course`] once every filled-in embed
//! passes the embed validator.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use video_embed::{check_embed, EmbedRejection, EmbedStatus};

/// Gradient given to courses created through the editor
pub const DEFAULT_BACK_GRADIENT: &str = "from-blue-600 to-indigo-900";

/// Icon given to courses created through the editor
pub const DEFAULT_BACK_ICON: &str = "ph-sketch-logo";

/// Category preselected for new drafts
pub const DEFAULT_CATEGORY: &str = "Design System";

/// Cover image preselected for new drafts
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?w=800";

/// Course editor errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseError {
    /// The course has no title
    #[error("Course title is required")]
    MissingTitle,

    /// No signed-in creator to own the course
    #[error("A signed-in creator is required")]
    MissingCreator,

    /// A lesson embed failed validation
    #[error("Embed of lesson \"{lesson}\" in module \"{module}\" is invalid: {reason}")]
    InvalidLessonEmbed {
        /// Module title
        module: String,
        /// Lesson title
        lesson: String,
        /// Why the embed was rejected
        reason: EmbedRejection,
    },

    /// The preview embed failed validation
    #[error("Preview embed is invalid: {0}")]
    InvalidPreviewEmbed(EmbedRejection),

    /// Referenced module does not exist
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// Referenced lesson does not exist
    #[error("Lesson not found: {0}")]
    LessonNotFound(String),
}

/// Result type for course operations
pub type Result<T> = std::result::Result<T, CourseError>;

/// A single lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// Lesson ID, unique within the course
    pub id: String,
    /// Lesson title
    pub title: String,
    /// Display duration such as `"05:00"`
    #[serde(default)]
    pub duration: String,
    /// Embed snippet of the lesson video
    #[serde(default)]
    pub video_src: String,
}

impl Lesson {
    /// Create a lesson without a video
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration: duration.into(),
            video_src: String::new(),
        }
    }

    /// Set the embed snippet
    pub fn with_video(mut self, video_src: impl Into<String>) -> Self {
        self.video_src = video_src.into();
        self
    }

    /// Check whether a video embed has been filled in
    pub fn has_video(&self) -> bool {
        !self.video_src.trim().is_empty()
    }
}

/// A group of lessons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    /// Module ID
    pub id: String,
    /// Module title
    pub title: String,
    /// Lessons in playback order
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl CourseModule {
    /// Create an empty module
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            lessons: Vec::new(),
        }
    }
}

/// A stored course record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course ID (assigned by the store)
    #[serde(default)]
    pub id: String,
    /// Title
    pub title: String,
    /// Price in the platform currency
    #[serde(default)]
    pub price: f64,
    /// Category label
    #[serde(default)]
    pub category: String,
    /// Cover image URL
    #[serde(default)]
    pub image_url: String,
    /// Embed snippet of the preview video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_embed_code: Option<String>,
    /// Modules in order
    #[serde(default)]
    pub modules: Vec<CourseModule>,
    /// Owner
    pub creator_id: String,
    /// Card backdrop gradient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_gradient: Option<String>,
    /// Card backdrop icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_icon: Option<String>,
}

impl Course {
    /// Total number of lessons across modules
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Find a lesson and the module holding it
    pub fn find_lesson(&self, lesson_id: &str) -> Option<(&CourseModule, &Lesson)> {
        self.modules.iter().find_map(|module| {
            module
                .lessons
                .iter()
                .find(|lesson| lesson.id == lesson_id)
                .map(|lesson| (module, lesson))
        })
    }

    /// Preview embed, if a non-blank one is stored
    pub fn preview_embed(&self) -> Option<&str> {
        self.preview_embed_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }
}

/// Editor state for creating or updating a course
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    /// ID of the course being edited; `None` when creating
    pub course_id: Option<String>,
    /// Title
    pub title: String,
    /// Price
    pub price: f64,
    /// Category
    pub category: String,
    /// Cover image URL
    pub image_url: String,
    /// Preview embed snippet
    pub preview_embed_code: String,
    /// Modules
    pub modules: Vec<CourseModule>,
    /// ID of the signed-in creator
    pub creator_id: Option<String>,
    next_id: u64,
}

impl CourseDraft {
    /// Draft for a new course, seeded with one introductory module
    pub fn new(creator_id: Option<String>) -> Self {
        let mut intro = CourseModule::new("m1", "Módulo 01: Introdução");
        intro.lessons.push(Lesson::new("l1", "Boas-vindas", "05:00"));

        Self {
            course_id: None,
            title: String::new(),
            price: 0.0,
            category: DEFAULT_CATEGORY.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            preview_embed_code: String::new(),
            modules: vec![intro],
            creator_id,
            next_id: 1,
        }
    }

    /// Draft editing an existing course
    pub fn edit(course: Course, creator_id: Option<String>) -> Self {
        Self {
            course_id: Some(course.id),
            title: course.title,
            price: course.price,
            category: course.category,
            image_url: course.image_url,
            preview_embed_code: course.preview_embed_code.unwrap_or_default(),
            modules: course.modules,
            creator_id,
            next_id: 1,
        }
    }

    /// Check whether this draft creates a new course
    pub fn is_new(&self) -> bool {
        self.course_id.is_none()
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            let id = format!("{}-{}", prefix, self.next_id);
            self.next_id += 1;
            let taken = self.modules.iter().any(|m| {
                m.id == id || m.lessons.iter().any(|l| l.id == id)
            });
            if !taken {
                return id;
            }
        }
    }

    /// Append an empty module and return its ID
    pub fn add_module(&mut self) -> String {
        let id = self.fresh_id("m");
        let title = format!("Novo Módulo {}", self.modules.len() + 1);
        self.modules.push(CourseModule::new(id.clone(), title));
        id
    }

    /// Remove a module with all its lessons
    pub fn remove_module(&mut self, module_id: &str) -> Result<CourseModule> {
        let index = self
            .modules
            .iter()
            .position(|m| m.id == module_id)
            .ok_or_else(|| CourseError::ModuleNotFound(module_id.to_string()))?;
        Ok(self.modules.remove(index))
    }

    /// Append a placeholder lesson to a module and return its ID
    pub fn add_lesson(&mut self, module_id: &str) -> Result<String> {
        if !self.modules.iter().any(|m| m.id == module_id) {
            return Err(CourseError::ModuleNotFound(module_id.to_string()));
        }
        let id = self.fresh_id("l");
        let module = self.module_mut(module_id)?;
        module.lessons.push(Lesson::new(id.clone(), "Nova Aula", "10:00"));
        Ok(id)
    }

    /// Remove a lesson from a module
    pub fn remove_lesson(&mut self, module_id: &str, lesson_id: &str) -> Result<Lesson> {
        let module = self.module_mut(module_id)?;
        let index = module
            .lessons
            .iter()
            .position(|l| l.id == lesson_id)
            .ok_or_else(|| CourseError::LessonNotFound(lesson_id.to_string()))?;
        Ok(module.lessons.remove(index))
    }

    /// Mutable access to a lesson
    pub fn lesson_mut(&mut self, module_id: &str, lesson_id: &str) -> Result<&mut Lesson> {
        self.module_mut(module_id)?
            .lessons
            .iter_mut()
            .find(|l| l.id == lesson_id)
            .ok_or_else(|| CourseError::LessonNotFound(lesson_id.to_string()))
    }

    fn module_mut(&mut self, module_id: &str) -> Result<&mut CourseModule> {
        self.modules
            .iter_mut()
            .find(|m| m.id == module_id)
            .ok_or_else(|| CourseError::ModuleNotFound(module_id.to_string()))
    }

    /// Badge state for the preview embed field
    pub fn preview_status(&self) -> EmbedStatus {
        EmbedStatus::of(&self.preview_embed_code)
    }

    /// Badge state for a lesson's embed field
    pub fn lesson_status(&self, module_id: &str, lesson_id: &str) -> Option<EmbedStatus> {
        self.modules
            .iter()
            .find(|m| m.id == module_id)?
            .lessons
            .iter()
            .find(|l| l.id == lesson_id)
            .map(|l| EmbedStatus::of(&l.video_src))
    }

    /// Check the draft can be saved
    ///
    /// Blank embed fields are allowed; filled ones must be valid.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CourseError::MissingTitle);
        }
        if self.creator_id.as_deref().map_or(true, str::is_empty) {
            return Err(CourseError::MissingCreator);
        }

        for module in &self.modules {
            for lesson in module.lessons.iter().filter(|l| l.has_video()) {
                if let Err(reason) = check_embed(&lesson.video_src) {
                    return Err(CourseError::InvalidLessonEmbed {
                        module: module.title.clone(),
                        lesson: lesson.title.clone(),
                        reason,
                    });
                }
            }
        }

        if !self.preview_embed_code.trim().is_empty() {
            check_embed(&self.preview_embed_code).map_err(CourseError::InvalidPreviewEmbed)?;
        }

        Ok(())
    }

    /// Validate and build the course record to persist
    pub fn into_course(self) -> Result<Course> {
        self.validate()?;

        let is_new = self.is_new();
        let preview_embed_code = Some(self.preview_embed_code);
        let (back_gradient, back_icon) = if is_new {
            (
                Some(DEFAULT_BACK_GRADIENT.to_string()),
                Some(DEFAULT_BACK_ICON.to_string()),
            )
        } else {
            (None, None)
        };

        tracing::debug!(title = %self.title, is_new, "course draft accepted");

        Ok(Course {
            id: self.course_id.unwrap_or_default(),
            title: self.title,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            preview_embed_code,
            modules: self.modules,
            creator_id: self.creator_id.unwrap_or_default(),
            back_gradient,
            back_icon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YOUTUBE: &str =
        r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe>"#;
    const VIMEO: &str = r#"<iframe src="https://player.vimeo.com/video/76979871"></iframe>"#;

    fn titled_draft() -> CourseDraft {
        let mut draft = CourseDraft::new(Some("creator-1".to_string()));
        draft.title = "Figma do zero".to_string();
        draft
    }

    fn sample_course() -> Course {
        let mut first = CourseModule::new("m1", "Intro");
        first.lessons.push(Lesson::new("l1", "Welcome", "05:00").with_video(YOUTUBE));
        first.lessons.push(Lesson::new("l2", "Setup", "10:00"));
        let mut second = CourseModule::new("m2", "Advanced");
        second.lessons.push(Lesson::new("l3", "Tokens", "12:00").with_video(VIMEO));

        Course {
            id: "c1".to_string(),
            title: "Design Systems".to_string(),
            price: 197.0,
            category: "Design System".to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            preview_embed_code: Some(YOUTUBE.to_string()),
            modules: vec![first, second],
            creator_id: "creator-1".to_string(),
            back_gradient: None,
            back_icon: None,
        }
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = CourseDraft::new(None);
        assert!(draft.is_new());
        assert_eq!(draft.category, DEFAULT_CATEGORY);
        assert_eq!(draft.modules.len(), 1);
        assert_eq!(draft.modules[0].lessons[0].duration, "05:00");
        assert_eq!(draft.preview_status(), EmbedStatus::Empty);
    }

    #[test]
    fn test_title_required() {
        let draft = CourseDraft::new(Some("creator-1".to_string()));
        assert_eq!(draft.validate(), Err(CourseError::MissingTitle));
    }

    #[test]
    fn test_creator_required() {
        let mut draft = titled_draft();
        draft.creator_id = None;
        assert_eq!(draft.validate(), Err(CourseError::MissingCreator));
    }

    #[test]
    fn test_blank_embeds_are_allowed() {
        assert!(titled_draft().validate().is_ok());
    }

    #[test]
    fn test_invalid_lesson_embed_blocks_save() {
        let mut draft = titled_draft();
        draft.lesson_mut("m1", "l1").unwrap().video_src =
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string();

        let err = draft.validate().unwrap_err();
        assert_eq!(
            err,
            CourseError::InvalidLessonEmbed {
                module: "Módulo 01: Introdução".to_string(),
                lesson: "Boas-vindas".to_string(),
                reason: EmbedRejection::MissingIframe,
            }
        );
        assert_eq!(draft.lesson_status("m1", "l1"), Some(EmbedStatus::Invalid));
    }

    #[test]
    fn test_invalid_preview_embed_blocks_save() {
        let mut draft = titled_draft();
        draft.preview_embed_code =
            r#"<iframe src="https://example.com/video/1"></iframe>"#.to_string();

        assert_eq!(
            draft.validate(),
            Err(CourseError::InvalidPreviewEmbed(EmbedRejection::UnsupportedHost))
        );
    }

    #[test]
    fn test_into_course_sets_new_course_defaults() {
        let mut draft = titled_draft();
        draft.preview_embed_code = VIMEO.to_string();
        draft.lesson_mut("m1", "l1").unwrap().video_src = YOUTUBE.to_string();

        let course = draft.into_course().unwrap();
        assert_eq!(course.back_gradient.as_deref(), Some(DEFAULT_BACK_GRADIENT));
        assert_eq!(course.back_icon.as_deref(), Some(DEFAULT_BACK_ICON));
        assert_eq!(course.creator_id, "creator-1");
        assert_eq!(course.lesson_count(), 1);
    }

    #[test]
    fn test_editing_keeps_existing_visuals() {
        let mut draft = CourseDraft::edit(sample_course(), Some("creator-1".to_string()));
        assert!(!draft.is_new());
        draft.title = "Design Systems 2".to_string();

        let course = draft.into_course().unwrap();
        assert_eq!(course.id, "c1");
        assert!(course.back_gradient.is_none());
    }

    #[test]
    fn test_module_and_lesson_editing() {
        let mut draft = titled_draft();
        let module_id = draft.add_module();
        assert_eq!(draft.modules[1].title, "Novo Módulo 2");

        let lesson_id = draft.add_lesson(&module_id).unwrap();
        let second = draft.add_lesson(&module_id).unwrap();
        assert_ne!(lesson_id, second);
        assert_eq!(draft.modules[1].lessons.len(), 2);

        let removed = draft.remove_lesson(&module_id, &lesson_id).unwrap();
        assert_eq!(removed.title, "Nova Aula");

        draft.remove_module(&module_id).unwrap();
        assert_eq!(draft.modules.len(), 1);
        assert_eq!(
            draft.add_lesson("missing"),
            Err(CourseError::ModuleNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_find_lesson() {
        let course = sample_course();
        let (module, lesson) = course.find_lesson("l3").unwrap();
        assert_eq!(module.id, "m2");
        assert_eq!(lesson.title, "Tokens");
        assert!(course.find_lesson("l9").is_none());
        assert_eq!(course.lesson_count(), 3);
    }

    #[test]
    fn test_course_deserializes_store_record() {
        let course: Course = serde_json::from_str(
            r#"{
                "id": "c9",
                "title": "Motion",
                "price": 49.9,
                "creator_id": "u1",
                "preview_embed_code": "  ",
                "modules": [{ "id": "m1", "title": "A", "lessons": [
                    { "id": "l1", "title": "B", "duration": "03:00", "videoSrc": "" }
                ]}]
            }"#,
        )
        .unwrap();

        assert_eq!(course.lesson_count(), 1);
        assert!(course.preview_embed().is_none());
    }
}
