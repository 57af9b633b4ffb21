use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::model::course::Course;
use crate::model::ids::{CourseId, LessonId, UserId};

/// A student's progress through one course.
///
/// Stores the set of completed lesson ids; the completion fraction is
/// always derived against the course so it cannot drift out of sync with
/// the lesson list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseProgress {
    student_id: UserId,
    course_id: CourseId,
    started_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
    completed_lessons: BTreeSet<LessonId>,
}

impl CourseProgress {
    /// Creates an empty progress record at enrollment time.
    #[must_use]
    pub fn new(student_id: UserId, course_id: CourseId, started_at: DateTime<Utc>) -> Self {
        Self {
            student_id,
            course_id,
            started_at,
            last_accessed_at: started_at,
            completed_lessons: BTreeSet::new(),
        }
    }

    // Accessors
    #[must_use]
    pub fn student_id(&self) -> UserId {
        self.student_id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_lessons.len()
    }

    #[must_use]
    pub fn is_completed(&self, lesson_id: LessonId) -> bool {
        self.completed_lessons.contains(&lesson_id)
    }

    /// Record a lesson as completed; repeating a lesson is not an error.
    ///
    /// Returns true when the lesson was newly completed.
    pub fn complete_lesson(&mut self, lesson_id: LessonId, at: DateTime<Utc>) -> bool {
        self.last_accessed_at = at;
        self.completed_lessons.insert(lesson_id)
    }

    /// Update the last-accessed timestamp without completing anything.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_accessed_at = at;
    }

    /// Completion fraction in 0.0..=1.0 against the given course.
    ///
    /// A course without lessons reports 0.0 rather than dividing by zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self, course: &Course) -> f32 {
        let total = course.lesson_count();
        if total == 0 {
            return 0.0;
        }
        let completed = course
            .lessons()
            .filter(|l| self.completed_lessons.contains(&l.id()))
            .count();
        completed as f32 / total as f32
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
