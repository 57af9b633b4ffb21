//! Demo data for the in-memory store.
//!
//! The platform has no backend; every screen is fed from this fixture set,
//! the way the original served its pages from static mock arrays. Ids are
//! stable so tests and the demo binary can reference them directly.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use thiserror::Error;
use url::Url;

use campus_core::model::{
    Assessment, AssessmentError, CalendarError, CalendarEvent, ChoiceOption, Course, CourseError,
    CourseLevel, CourseModule, CourseProgress, CourseStatus, EventId, EventKind, ForumError,
    ForumReply, ForumThread, Lesson, LessonContent, LessonId, ModuleId, Notification,
    NotificationError, NotificationId, NotificationKind, OptionId, Question, QuestionId,
    QuestionKind, ReplyId, Role, ThreadId, User, UserError, UserId, UserStatus,
};

use crate::repository::{Storage, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FixtureError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Forum(#[from] ForumError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error("invalid fixture media url: {0}")]
    MediaUrl(#[from] url::ParseError),
}

/// Well-known fixture ids, for tests and the demo binary.
pub mod ids {
    use campus_core::model::{AssessmentId, CourseId, UserId};

    pub const ADMIN: UserId = UserId::new(1);
    pub const TEACHER_LUIS: UserId = UserId::new(2);
    pub const TEACHER_ELENA: UserId = UserId::new(3);
    pub const STUDENT_ANA: UserId = UserId::new(4);
    pub const STUDENT_JORGE: UserId = UserId::new(5);

    pub const COURSE_WEB: CourseId = CourseId::new(1);
    pub const COURSE_REACT: CourseId = CourseId::new(2);
    pub const COURSE_UX_DRAFT: CourseId = CourseId::new(3);

    pub const EXAM_HTML_CSS: AssessmentId = AssessmentId::new(1);
    pub const QUIZ_REACT: AssessmentId = AssessmentId::new(2);
}

/// Seed the full demo data set into the given storage.
///
/// `now` anchors registration dates, progress timestamps, and calendar
/// entries so seeded data is deterministic under a fixed clock.
///
/// # Errors
///
/// Returns `FixtureError` if a fixture fails validation or storage
/// rejects a write.
pub async fn seed_demo(storage: &Storage, now: DateTime<Utc>) -> Result<(), FixtureError> {
    for user in demo_users(now)? {
        storage.users.upsert_user(&user).await?;
    }
    for course in demo_courses(now)? {
        storage.courses.upsert_course(&course).await?;
    }
    for assessment in demo_assessments(now)? {
        storage.assessments.upsert_assessment(&assessment).await?;
    }
    for progress in demo_progress(now) {
        storage.progress.upsert_progress(&progress).await?;
    }
    for notification in demo_notifications(now)? {
        storage.notifications.upsert_notification(&notification).await?;
    }
    for thread in demo_threads(now)? {
        storage.forums.upsert_thread(&thread).await?;
    }
    for event in demo_events(now)? {
        storage.events.upsert_event(&event).await?;
    }
    Ok(())
}

fn demo_users(now: DateTime<Utc>) -> Result<Vec<User>, UserError> {
    let joined = now - Duration::days(120);
    Ok(vec![
        User::new(
            ids::ADMIN,
            "Carmen",
            "Soto",
            "carmen.soto@campus.example",
            Role::Admin,
            joined,
        )?,
        User::new(
            ids::TEACHER_LUIS,
            "Luis",
            "Ramírez",
            "luis.ramirez@campus.example",
            Role::Teacher,
            joined + Duration::days(3),
        )?,
        User::new(
            ids::TEACHER_ELENA,
            "Elena",
            "Vega",
            "elena.vega@campus.example",
            Role::Teacher,
            joined + Duration::days(10),
        )?,
        User::new(
            ids::STUDENT_ANA,
            "Ana",
            "Martínez",
            "ana.martinez@campus.example",
            Role::Student,
            joined + Duration::days(30),
        )?,
        User::new(
            ids::STUDENT_JORGE,
            "Jorge",
            "Díaz",
            "jorge.diaz@campus.example",
            Role::Student,
            joined + Duration::days(45),
        )?,
        User::new(
            UserId::new(6),
            "Pablo",
            "Ortiz",
            "pablo.ortiz@campus.example",
            Role::Student,
            joined + Duration::days(60),
        )?
        .with_status(UserStatus::Inactive),
    ])
}

fn video(source: &str) -> Result<LessonContent, url::ParseError> {
    Ok(LessonContent::Video {
        source: Url::parse(source)?,
    })
}

fn demo_courses(now: DateTime<Utc>) -> Result<Vec<Course>, FixtureError> {
    let created = now - Duration::days(90);

    let html_basics = CourseModule::new(
        ModuleId::new(11),
        "HTML Basics",
        Some("Document structure, tags and attributes.".into()),
        1,
        vec![
            Lesson::new(
                LessonId::new(111),
                "Your first page",
                video("https://cdn.campus.example/lessons/html-first-page.mp4")?,
                12,
                1,
            )?,
            Lesson::new(
                LessonId::new(112),
                "Links and images",
                LessonContent::Text {
                    body: "Anchors point elsewhere with href; images embed with src.".into(),
                },
                8,
                2,
            )?,
        ],
    )?;

    let css_foundations = CourseModule::new(
        ModuleId::new(12),
        "CSS Foundations",
        Some("Selectors, the cascade, and the box model.".into()),
        2,
        vec![
            Lesson::new(
                LessonId::new(121),
                "Selectors and specificity",
                LessonContent::Text {
                    body: "Classes apply to many elements; ids must be unique per page.".into(),
                },
                15,
                1,
            )?,
            Lesson::new(
                LessonId::new(122),
                "Final exam",
                LessonContent::Quiz {
                    assessment_id: ids::EXAM_HTML_CSS,
                },
                60,
                2,
            )?,
        ],
    )?;

    let react_components = CourseModule::new(
        ModuleId::new(21),
        "Components & Props",
        None,
        1,
        vec![
            Lesson::new(
                LessonId::new(211),
                "Thinking in components",
                video("https://cdn.campus.example/lessons/react-components.mp4")?,
                18,
                1,
            )?,
            Lesson::new(
                LessonId::new(212),
                "Hooks at a glance",
                LessonContent::Text {
                    body: "Hooks let function components hold state and effects.".into(),
                },
                10,
                2,
            )?,
            Lesson::new(
                LessonId::new(213),
                "Components quiz",
                LessonContent::Quiz {
                    assessment_id: ids::QUIZ_REACT,
                },
                45,
                3,
            )?,
        ],
    )?;

    let ux_intro = CourseModule::new(
        ModuleId::new(31),
        "What is UX?",
        None,
        1,
        vec![Lesson::new(
            LessonId::new(311),
            "Usability first",
            LessonContent::Text {
                body: "Design for the reader, not the author.".into(),
            },
            9,
            1,
        )?],
    )?;

    Ok(vec![
        Course::new(
            ids::COURSE_WEB,
            "Web Development Fundamentals",
            "HTML and CSS from zero: structure, style and a final exam.",
            ids::TEACHER_LUIS,
            "Development",
            CourseLevel::Beginner,
            300,
            created,
            vec![html_basics, css_foundations],
        )?
        .with_status(CourseStatus::Published)
        .with_average_rating(4.5)?,
        Course::new(
            ids::COURSE_REACT,
            "React from the Ground Up",
            "Component model, props, hooks, and the rendering lifecycle.",
            ids::TEACHER_ELENA,
            "Development",
            CourseLevel::Intermediate,
            420,
            created + Duration::days(20),
            vec![react_components],
        )?
        .with_status(CourseStatus::Published)
        .with_average_rating(4.7)?,
        Course::new(
            ids::COURSE_UX_DRAFT,
            "UX Design Essentials",
            "Heuristics, research and prototyping.",
            ids::TEACHER_LUIS,
            "Design",
            CourseLevel::Beginner,
            240,
            created + Duration::days(40),
            vec![ux_intro],
        )?,
    ])
}

fn demo_assessments(now: DateTime<Utc>) -> Result<Vec<Assessment>, AssessmentError> {
    let exam = Assessment::new(
        ids::EXAM_HTML_CSS,
        ids::COURSE_WEB,
        "Final Exam: HTML & CSS",
        "Covers the basic HTML and CSS concepts from the course.",
        60,
        2,
        (Some(now - Duration::days(30)), Some(now + Duration::days(30))),
        vec![
            Question::new(
                QuestionId::new(1011),
                "Which HTML tag creates a hyperlink?",
                QuestionKind::SingleChoice,
                1,
                vec![
                    ChoiceOption::new(OptionId::new(10111), "<a>", true),
                    ChoiceOption::new(OptionId::new(10112), "<link>", false),
                    ChoiceOption::new(OptionId::new(10113), "<href>", false),
                    ChoiceOption::new(OptionId::new(10114), "<url>", false),
                ],
            )?,
            Question::new(
                QuestionId::new(1012),
                "CSS stands for Cascading Style Sheets.",
                QuestionKind::TrueFalse,
                1,
                vec![
                    ChoiceOption::new(OptionId::new(10121), "True", true),
                    ChoiceOption::new(OptionId::new(10122), "False", false),
                ],
            )?,
            Question::new(
                QuestionId::new(1013),
                "Explain the difference between classes and ids in CSS.",
                QuestionKind::ShortAnswer,
                2,
                Vec::new(),
            )?,
        ],
    )?;

    let quiz = Assessment::new(
        ids::QUIZ_REACT,
        ids::COURSE_REACT,
        "React Components Quiz",
        "Component types and lifecycle, hooks included.",
        45,
        3,
        (Some(now - Duration::days(10)), Some(now + Duration::days(50))),
        vec![
            Question::new(
                QuestionId::new(2011),
                "What are hooks in React?",
                QuestionKind::ShortAnswer,
                2,
                Vec::new(),
            )?,
            Question::new(
                QuestionId::new(2012),
                "Which of the following is NOT a React hook?",
                QuestionKind::SingleChoice,
                1,
                vec![
                    ChoiceOption::new(OptionId::new(20121), "useState", false),
                    ChoiceOption::new(OptionId::new(20122), "useEffect", false),
                    ChoiceOption::new(OptionId::new(20123), "useContext", false),
                    ChoiceOption::new(OptionId::new(20124), "useHistory", true),
                ],
            )?,
        ],
    )?;

    Ok(vec![exam, quiz])
}

fn demo_progress(now: DateTime<Utc>) -> Vec<CourseProgress> {
    let mut ana = CourseProgress::new(ids::STUDENT_ANA, ids::COURSE_WEB, now - Duration::days(14));
    ana.complete_lesson(LessonId::new(111), now - Duration::days(12));
    ana.complete_lesson(LessonId::new(112), now - Duration::days(9));

    let mut jorge =
        CourseProgress::new(ids::STUDENT_JORGE, ids::COURSE_REACT, now - Duration::days(7));
    jorge.complete_lesson(LessonId::new(211), now - Duration::days(5));

    vec![ana, jorge]
}

fn demo_notifications(now: DateTime<Utc>) -> Result<Vec<Notification>, NotificationError> {
    let mut read = Notification::new(
        NotificationId::new(302),
        ids::STUDENT_ANA,
        "Lesson completed",
        "\"Links and images\" is done. Keep it up!",
        NotificationKind::Success,
        now - Duration::days(9),
    )?;
    read.mark_read();

    Ok(vec![
        Notification::new(
            NotificationId::new(301),
            ids::STUDENT_ANA,
            "New assessment available",
            "The HTML & CSS final is open for the next 30 days.",
            NotificationKind::Info,
            now - Duration::days(2),
        )?
        .with_link("/assessments/1"),
        read,
        Notification::new(
            NotificationId::new(303),
            ids::STUDENT_JORGE,
            "Deadline approaching",
            "The React quiz closes soon.",
            NotificationKind::Warning,
            now - Duration::days(1),
        )?,
    ])
}

fn demo_threads(now: DateTime<Utc>) -> Result<Vec<ForumThread>, ForumError> {
    let mut selectors = ForumThread::new(
        ThreadId::new(401),
        ids::COURSE_WEB,
        ids::STUDENT_ANA,
        "Doubt about CSS selectors",
        "Is an #id selector always more specific than a .class selector?",
        now - Duration::days(4),
    )?;
    selectors.push_reply(ForumReply::new(
        ReplyId::new(4011),
        ids::TEACHER_LUIS,
        "Yes: ids outweigh classes in the specificity triple.",
        now - Duration::days(4) + Duration::hours(2),
    )?);
    selectors.push_reply(ForumReply::new(
        ReplyId::new(4012),
        ids::STUDENT_JORGE,
        "The inspector shows the computed specificity, handy for checking.",
        now - Duration::days(3),
    )?);

    Ok(vec![selectors])
}

fn demo_events(now: DateTime<Utc>) -> Result<Vec<CalendarEvent>, CalendarError> {
    let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default();
    let eleven = NaiveTime::from_hms_opt(11, 0, 0).unwrap_or_default();

    Ok(vec![
        CalendarEvent::new(
            EventId::new(501),
            "Live Q&A: HTML & CSS",
            (now + Duration::days(2)).date_naive(),
            EventKind::Class,
        )?
        .with_times(ten, eleven)?
        .with_course(ids::COURSE_WEB),
        CalendarEvent::new(
            EventId::new(502),
            "HTML & CSS final closes",
            (now + Duration::days(30)).date_naive(),
            EventKind::Assessment,
        )?
        .with_course(ids::COURSE_WEB),
        CalendarEvent::new(
            EventId::new(503),
            "Semester planning",
            (now - Duration::days(10)).date_naive(),
            EventKind::Other,
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::time::fixed_now;

    #[tokio::test]
    async fn seed_is_idempotent() {
        let storage = Storage::in_memory();
        seed_demo(&storage, fixed_now()).await.unwrap();
        seed_demo(&storage, fixed_now()).await.unwrap();

        assert_eq!(storage.courses.list_courses().await.unwrap().len(), 3);
        assert_eq!(storage.users.list_users().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn quiz_lessons_reference_seeded_assessments() {
        let storage = Storage::in_memory();
        seed_demo(&storage, fixed_now()).await.unwrap();

        let course = storage.courses.get_course(ids::COURSE_WEB).await.unwrap();
        let quiz_ids: Vec<_> = course
            .lessons()
            .filter_map(|l| match l.content() {
                LessonContent::Quiz { assessment_id } => Some(*assessment_id),
                _ => None,
            })
            .collect();
        assert_eq!(quiz_ids, [ids::EXAM_HTML_CSS]);

        let exam = storage
            .assessments
            .get_assessment(ids::EXAM_HTML_CSS)
            .await
            .unwrap();
        assert_eq!(exam.question_count(), 3);
        assert_eq!(exam.time_limit_mins(), 60);
        assert_eq!(exam.allowed_attempts(), 2);
    }
}
