use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::model::ids::{AssessmentId, CourseId, LessonId, ModuleId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyCourseTitle,

    #[error("module title cannot be empty")]
    EmptyModuleTitle,

    #[error("lesson title cannot be empty")]
    EmptyLessonTitle,

    #[error("text lesson body cannot be empty")]
    EmptyLessonBody,

    #[error("average rating must be within 0.0..=5.0")]
    InvalidRating,
}

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

/// Difficulty level shown on catalog cards and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Publication state of a course.
///
/// Only `Published` courses appear in the student catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Typed lesson payload.
///
/// The kind tag and the payload travel together so a video lesson cannot
/// carry quiz content and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub enum LessonContent {
    Video { source: Url },
    Text { body: String },
    Quiz { assessment_id: AssessmentId },
}

impl LessonContent {
    /// Short tag for display and filtering.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            LessonContent::Video { .. } => "video",
            LessonContent::Text { .. } => "text",
            LessonContent::Quiz { .. } => "quiz",
        }
    }
}

/// A single lesson inside a module.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    content: LessonContent,
    duration_mins: u32,
    position: u32,
}

impl Lesson {
    /// Creates a lesson.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` for an empty title, or an empty body on a
    /// text lesson.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        content: LessonContent,
        duration_mins: u32,
        position: u32,
    ) -> Result<Self, CourseError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyLessonTitle);
        }
        if let LessonContent::Text { body } = &content {
            if body.trim().is_empty() {
                return Err(CourseError::EmptyLessonBody);
            }
        }

        Ok(Self {
            id,
            title,
            content,
            duration_mins,
            position,
        })
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &LessonContent {
        &self.content
    }

    #[must_use]
    pub fn duration_mins(&self) -> u32 {
        self.duration_mins
    }

    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// An ordered group of lessons within a course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseModule {
    id: ModuleId,
    title: String,
    description: Option<String>,
    position: u32,
    lessons: Vec<Lesson>,
}

impl CourseModule {
    /// Creates a module; lessons are sorted by their position.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyModuleTitle` for a blank title.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        description: Option<String>,
        position: u32,
        mut lessons: Vec<Lesson>,
    ) -> Result<Self, CourseError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyModuleTitle);
        }
        lessons.sort_by_key(Lesson::position);

        Ok(Self {
            id,
            title,
            description: description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            position,
            lessons,
        })
    }

    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course: catalog metadata plus its ordered module tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    teacher_id: UserId,
    category: String,
    level: CourseLevel,
    duration_mins: u32,
    status: CourseStatus,
    average_rating: Option<f32>,
    created_at: DateTime<Utc>,
    modules: Vec<CourseModule>,
}

impl Course {
    /// Creates a course; modules are sorted by their position.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyCourseTitle` for a blank title.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        teacher_id: UserId,
        category: impl Into<String>,
        level: CourseLevel,
        duration_mins: u32,
        created_at: DateTime<Utc>,
        mut modules: Vec<CourseModule>,
    ) -> Result<Self, CourseError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyCourseTitle);
        }
        modules.sort_by_key(CourseModule::position);

        Ok(Self {
            id,
            title,
            description: description.into().trim().to_owned(),
            teacher_id,
            category: category.into().trim().to_owned(),
            level,
            duration_mins,
            status: CourseStatus::Draft,
            average_rating: None,
            created_at,
            modules,
        })
    }

    /// Override the publication state.
    #[must_use]
    pub fn with_status(mut self, status: CourseStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach an average rating.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::InvalidRating` outside 0.0..=5.0.
    pub fn with_average_rating(mut self, rating: f32) -> Result<Self, CourseError> {
        if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
            return Err(CourseError::InvalidRating);
        }
        self.average_rating = Some(rating);
        Ok(self)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn teacher_id(&self) -> UserId {
        self.teacher_id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn level(&self) -> CourseLevel {
        self.level
    }

    #[must_use]
    pub fn duration_mins(&self) -> u32 {
        self.duration_mins
    }

    #[must_use]
    pub fn status(&self) -> CourseStatus {
        self.status
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    #[must_use]
    pub fn average_rating(&self) -> Option<f32> {
        self.average_rating
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn modules(&self) -> &[CourseModule] {
        &self.modules
    }

    /// Total number of lessons across all modules.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons().len()).sum()
    }

    /// Iterate lessons in course order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons().iter())
    }

    /// Look up a lesson anywhere in the module tree.
    #[must_use]
    pub fn find_lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons().find(|l| l.id() == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn text_lesson(id: u64, position: u32) -> Lesson {
        Lesson::new(
            LessonId::new(id),
            format!("Lesson {id}"),
            LessonContent::Text {
                body: "content".into(),
            },
            10,
            position,
        )
        .unwrap()
    }

    fn build_course(modules: Vec<CourseModule>) -> Course {
        Course::new(
            CourseId::new(1),
            "Web Development Basics",
            "HTML, CSS and a first taste of JavaScript.",
            UserId::new(2),
            "Development",
            CourseLevel::Beginner,
            300,
            fixed_now(),
            modules,
        )
        .unwrap()
    }

    #[test]
    fn course_rejects_empty_title() {
        let err = Course::new(
            CourseId::new(1),
            "  ",
            "desc",
            UserId::new(2),
            "Development",
            CourseLevel::Beginner,
            300,
            fixed_now(),
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, CourseError::EmptyCourseTitle);
    }

    #[test]
    fn modules_and_lessons_sort_by_position() {
        let module_b = CourseModule::new(
            ModuleId::new(2),
            "Second",
            None,
            2,
            vec![text_lesson(4, 2), text_lesson(3, 1)],
        )
        .unwrap();
        let module_a =
            CourseModule::new(ModuleId::new(1), "First", None, 1, vec![text_lesson(1, 1)]).unwrap();

        let course = build_course(vec![module_b, module_a]);

        let titles: Vec<_> = course.modules().iter().map(CourseModule::title).collect();
        assert_eq!(titles, ["First", "Second"]);

        let lesson_ids: Vec<_> = course.lessons().map(Lesson::id).collect();
        assert_eq!(
            lesson_ids,
            [LessonId::new(1), LessonId::new(3), LessonId::new(4)]
        );
    }

    #[test]
    fn lesson_count_spans_modules() {
        let module_a =
            CourseModule::new(ModuleId::new(1), "A", None, 1, vec![text_lesson(1, 1)]).unwrap();
        let module_b = CourseModule::new(
            ModuleId::new(2),
            "B",
            None,
            2,
            vec![text_lesson(2, 1), text_lesson(3, 2)],
        )
        .unwrap();

        let course = build_course(vec![module_a, module_b]);
        assert_eq!(course.lesson_count(), 3);
        assert!(course.find_lesson(LessonId::new(3)).is_some());
        assert!(course.find_lesson(LessonId::new(9)).is_none());
    }

    #[test]
    fn text_lesson_rejects_empty_body() {
        let err = Lesson::new(
            LessonId::new(1),
            "Intro",
            LessonContent::Text { body: "  ".into() },
            5,
            1,
        )
        .unwrap_err();
        assert_eq!(err, CourseError::EmptyLessonBody);
    }

    #[test]
    fn course_starts_as_draft() {
        let course = build_course(Vec::new());
        assert_eq!(course.status(), CourseStatus::Draft);
        assert!(!course.is_published());

        let published = course.with_status(CourseStatus::Published);
        assert!(published.is_published());
    }

    #[test]
    fn rating_is_bounded() {
        let course = build_course(Vec::new());
        let err = course.clone().with_average_rating(5.5).unwrap_err();
        assert_eq!(err, CourseError::InvalidRating);

        let rated = course.with_average_rating(4.6).unwrap();
        assert_eq!(rated.average_rating(), Some(4.6));
    }
}
