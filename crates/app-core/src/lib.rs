//! Core application logic for Lido
//!
//! This crate contains the course model, the course editor checks, the
//! course detail and lesson player views that render provider embeds, and
//! application configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod course_detail;
pub mod courses;
pub mod player;

pub use config::{AppConfig, ConfigError};
pub use course_detail::CourseDetail;
pub use courses::{Course, CourseDraft, CourseError, CourseModule, Lesson};
pub use player::{LessonPlayer, PlayerProgress, PlaylistEntry};
