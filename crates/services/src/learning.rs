use serde::Serialize;
use std::sync::Arc;

use campus_core::Clock;
use campus_core::model::{CourseId, CourseProgress, LessonId, UserId};
use storage::repository::{CourseRepository, ProgressRepository};

use crate::error::LearningError;

/// Result of completing one lesson.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LessonOutcome {
    pub newly_completed: bool,
    pub completed: usize,
    pub total: usize,
    pub fraction: f32,
}

/// Progress card for one course, as the "my lessons" screen renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseProgressView {
    pub course_id: CourseId,
    pub course_title: String,
    pub completed: usize,
    pub total: usize,
    pub fraction: f32,
}

/// Tracks students working through course content.
#[derive(Clone)]
pub struct LearningService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl LearningService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            progress,
        }
    }

    /// Enroll the student: creates the progress record if it does not
    /// exist yet, otherwise returns the existing one untouched.
    ///
    /// # Errors
    ///
    /// Returns `LearningError::Storage` if the course is unknown or
    /// persistence fails.
    pub async fn start_course(
        &self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<CourseProgress, LearningError> {
        // Validates the course exists before enrolling.
        let _ = self.courses.get_course(course_id).await?;

        if let Some(existing) = self.progress.get_progress(student_id, course_id).await? {
            return Ok(existing);
        }

        let progress = CourseProgress::new(student_id, course_id, self.clock.now());
        self.progress.upsert_progress(&progress).await?;
        tracing::debug!(%student_id, %course_id, "student enrolled");
        Ok(progress)
    }

    /// Mark a lesson as completed, enrolling on the fly if needed.
    /// Completing the same lesson twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns `LearningError::UnknownLesson` if the lesson is not part
    /// of the course, or `LearningError::Storage` on storage failures.
    pub async fn complete_lesson(
        &self,
        student_id: UserId,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> Result<LessonOutcome, LearningError> {
        let course = self.courses.get_course(course_id).await?;
        if course.find_lesson(lesson_id).is_none() {
            return Err(LearningError::UnknownLesson);
        }

        let now = self.clock.now();
        let mut progress = self
            .progress
            .get_progress(student_id, course_id)
            .await?
            .unwrap_or_else(|| CourseProgress::new(student_id, course_id, now));

        let newly_completed = progress.complete_lesson(lesson_id, now);
        self.progress.upsert_progress(&progress).await?;

        Ok(LessonOutcome {
            newly_completed,
            completed: progress.completed_count(),
            total: course.lesson_count(),
            fraction: progress.fraction(&course),
        })
    }

    /// Progress card for one course; zeroed when the student has not
    /// started it.
    ///
    /// # Errors
    ///
    /// Returns `LearningError::Storage` if the course is unknown or
    /// storage fails.
    pub async fn progress_view(
        &self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<CourseProgressView, LearningError> {
        let course = self.courses.get_course(course_id).await?;
        let progress = self.progress.get_progress(student_id, course_id).await?;

        let (completed, fraction) = match &progress {
            Some(p) => (p.completed_count(), p.fraction(&course)),
            None => (0, 0.0),
        };

        Ok(CourseProgressView {
            course_id,
            course_title: course.title().to_owned(),
            completed,
            total: course.lesson_count(),
            fraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::time::{fixed_clock, fixed_now};
    use storage::fixtures::{ids, seed_demo};
    use storage::repository::Storage;

    async fn seeded_learning() -> (LearningService, Storage) {
        let storage = Storage::in_memory();
        seed_demo(&storage, fixed_now()).await.unwrap();
        let service = LearningService::new(
            fixed_clock(),
            Arc::clone(&storage.courses),
            Arc::clone(&storage.progress),
        );
        (service, storage)
    }

    #[tokio::test]
    async fn start_course_is_idempotent() {
        let (service, _storage) = seeded_learning().await;

        let first = service
            .start_course(ids::STUDENT_JORGE, ids::COURSE_WEB)
            .await
            .unwrap();
        assert_eq!(first.completed_count(), 0);

        // Ana is already enrolled with two lessons done; starting again
        // must not reset her.
        let ana = service
            .start_course(ids::STUDENT_ANA, ids::COURSE_WEB)
            .await
            .unwrap();
        assert_eq!(ana.completed_count(), 2);
    }

    #[tokio::test]
    async fn complete_lesson_moves_the_fraction() {
        let (service, _storage) = seeded_learning().await;

        let outcome = service
            .complete_lesson(ids::STUDENT_ANA, ids::COURSE_WEB, LessonId::new(121))
            .await
            .unwrap();
        assert!(outcome.newly_completed);
        assert_eq!(outcome.completed, 3);
        assert_eq!(outcome.total, 4);
        assert!((outcome.fraction - 0.75).abs() < f32::EPSILON);

        let again = service
            .complete_lesson(ids::STUDENT_ANA, ids::COURSE_WEB, LessonId::new(121))
            .await
            .unwrap();
        assert!(!again.newly_completed);
        assert_eq!(again.completed, 3);
    }

    #[tokio::test]
    async fn complete_rejects_foreign_lesson() {
        let (service, _storage) = seeded_learning().await;
        // Lesson 211 belongs to the React course, not the web course.
        let err = service
            .complete_lesson(ids::STUDENT_ANA, ids::COURSE_WEB, LessonId::new(211))
            .await
            .unwrap_err();
        assert!(matches!(err, LearningError::UnknownLesson));
    }

    #[tokio::test]
    async fn progress_view_zeroes_before_enrollment() {
        let (service, _storage) = seeded_learning().await;
        let view = service
            .progress_view(ids::STUDENT_JORGE, ids::COURSE_WEB)
            .await
            .unwrap();
        assert_eq!(view.completed, 0);
        assert_eq!(view.total, 4);
        assert_eq!(view.fraction, 0.0);
    }
}
