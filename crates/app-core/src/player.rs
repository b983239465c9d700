//! Lesson player
//!
//! Flattens a course's modules into a single playlist and tracks the current
//! lesson and which lessons the student has completed.

use crate::courses::{Course, Lesson};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use video_embed::{EmbedNormalizer, NormalizedEmbed};

/// Completion summary shown above the playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Lessons completed
    pub completed: usize,
    /// Lessons in the course
    pub total: usize,
    /// Completion percentage, rounded down
    pub percent: u8,
}

/// Entry of the flattened playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Title of the module holding the lesson
    pub module_title: String,
    /// The lesson
    pub lesson: Lesson,
}

/// Player state for one course
#[derive(Debug, Clone)]
pub struct LessonPlayer {
    course_id: String,
    playlist: Vec<PlaylistEntry>,
    current: usize,
    completed: HashSet<String>,
}

impl LessonPlayer {
    /// Open a course at its first lesson
    pub fn new(course: &Course) -> Self {
        let playlist = course
            .modules
            .iter()
            .flat_map(|module| {
                module.lessons.iter().map(move |lesson| PlaylistEntry {
                    module_title: module.title.clone(),
                    lesson: lesson.clone(),
                })
            })
            .collect();

        Self {
            course_id: course.id.clone(),
            playlist,
            current: 0,
            completed: HashSet::new(),
        }
    }

    /// Restore previously completed lessons
    ///
    /// IDs not in the playlist are ignored.
    pub fn with_completed<I, S>(mut self, lesson_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in lesson_ids {
            let id = id.into();
            if self.position(&id).is_some() {
                self.completed.insert(id);
            }
        }
        self
    }

    /// ID of the course being played
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Lessons in playback order
    pub fn playlist(&self) -> &[PlaylistEntry] {
        &self.playlist
    }

    /// The lesson on screen, `None` for a course without lessons
    pub fn current(&self) -> Option<&PlaylistEntry> {
        self.playlist.get(self.current)
    }

    fn position(&self, lesson_id: &str) -> Option<usize> {
        self.playlist.iter().position(|e| e.lesson.id == lesson_id)
    }

    /// Jump to a lesson; returns `false` if it is not in the playlist
    pub fn select(&mut self, lesson_id: &str) -> bool {
        match self.position(lesson_id) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// Advance to the next lesson; stays put on the last one
    pub fn next(&mut self) -> Option<&PlaylistEntry> {
        if self.current + 1 < self.playlist.len() {
            self.current += 1;
            self.playlist.get(self.current)
        } else {
            None
        }
    }

    /// Go back one lesson; stays put on the first one
    pub fn previous(&mut self) -> Option<&PlaylistEntry> {
        if self.current > 0 && !self.playlist.is_empty() {
            self.current -= 1;
            self.playlist.get(self.current)
        } else {
            None
        }
    }

    /// Mark the current lesson as completed
    pub fn mark_completed(&mut self) -> bool {
        match self.playlist.get(self.current) {
            Some(entry) => self.completed.insert(entry.lesson.id.clone()),
            None => false,
        }
    }

    /// Check whether a lesson is completed
    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed.contains(lesson_id)
    }

    /// Completion summary
    pub fn progress(&self) -> PlayerProgress {
        let total = self.playlist.len();
        let completed = self.completed.len();
        let percent = if total == 0 {
            0
        } else {
            (completed * 100 / total) as u8
        };

        PlayerProgress {
            completed,
            total,
            percent,
        }
    }

    /// Player for the current lesson, with native controls and sound left to the student
    pub fn lesson_embed(&self, normalizer: &EmbedNormalizer) -> Option<NormalizedEmbed> {
        let entry = self.current()?;
        if !entry.lesson.has_video() {
            tracing::debug!(lesson_id = %entry.lesson.id, "lesson has no video");
            return None;
        }
        Some(normalizer.lesson(&entry.lesson.video_src))
    }
}
