use std::sync::Arc;

use campus_core::model::{LessonContent, LessonId, NotificationKind};
use campus_core::time::{fixed_clock, fixed_now};
use services::{
    CatalogFilter, CatalogService, DashboardService, LearningService, NotificationService,
};
use storage::fixtures::{ids, seed_demo};
use storage::repository::Storage;

async fn seeded_storage() -> Storage {
    let storage = Storage::in_memory();
    seed_demo(&storage, fixed_now()).await.unwrap();
    storage
}

#[tokio::test]
async fn browse_learn_and_check_dashboard() {
    let storage = seeded_storage().await;
    let catalog = CatalogService::new(Arc::clone(&storage.courses));
    let learning = LearningService::new(
        fixed_clock(),
        Arc::clone(&storage.courses),
        Arc::clone(&storage.progress),
    );
    let dashboard = DashboardService::new(
        fixed_clock(),
        Arc::clone(&storage.courses),
        Arc::clone(&storage.progress),
        Arc::clone(&storage.notifications),
        Arc::clone(&storage.events),
    );

    // Jorge finds the web course in the catalog.
    let results = catalog
        .filtered(&CatalogFilter {
            search: Some("html".into()),
            ..CatalogFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    let course = &results[0];
    assert_eq!(course.id(), ids::COURSE_WEB);

    // He enrolls and works through the first module.
    learning
        .start_course(ids::STUDENT_JORGE, course.id())
        .await
        .unwrap();
    for lesson in course.modules()[0].lessons() {
        learning
            .complete_lesson(ids::STUDENT_JORGE, course.id(), lesson.id())
            .await
            .unwrap();
    }

    let view = learning
        .progress_view(ids::STUDENT_JORGE, course.id())
        .await
        .unwrap();
    assert_eq!(view.completed, 2);
    assert_eq!(view.total, 4);

    // The dashboard now shows both of his courses.
    let overview = dashboard.overview(ids::STUDENT_JORGE).await.unwrap();
    assert_eq!(overview.courses.len(), 2);
    assert_eq!(overview.lessons_completed, 3);
}

#[tokio::test]
async fn quiz_lesson_links_to_an_assessment() {
    let storage = seeded_storage().await;
    let catalog = CatalogService::new(Arc::clone(&storage.courses));

    let course = catalog.detail(ids::COURSE_WEB).await.unwrap();
    let quiz_lesson = course.find_lesson(LessonId::new(122)).expect("quiz lesson");
    match quiz_lesson.content() {
        LessonContent::Quiz { assessment_id } => {
            let assessment = storage
                .assessments
                .get_assessment(*assessment_id)
                .await
                .unwrap();
            assert_eq!(assessment.course_id(), course.id());
        }
        other => panic!("expected a quiz lesson, got {other:?}"),
    }
}

#[tokio::test]
async fn notifications_follow_course_activity() {
    let storage = seeded_storage().await;
    let notifications =
        NotificationService::new(fixed_clock(), Arc::clone(&storage.notifications));

    notifications
        .push(
            ids::STUDENT_JORGE,
            "Module completed",
            "Components & Props is done.",
            NotificationKind::Success,
            Some("/courses/2".into()),
        )
        .await
        .unwrap();

    let inbox = notifications.inbox(ids::STUDENT_JORGE).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].title(), "Module completed");
    assert_eq!(
        notifications.unread_count(ids::STUDENT_JORGE).await.unwrap(),
        2
    );
}
