use std::sync::Arc;

use chrono::{DateTime, Utc};

use campus_core::Clock;
use campus_core::model::{CalendarEvent, CourseId, UserId};
use storage::repository::{
    CourseRepository, EventRepository, NotificationRepository, ProgressRepository,
};

use crate::error::DashboardError;

const UPCOMING_EVENT_LIMIT: usize = 5;

/// One row of the "my courses" widget.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseProgressItem {
    pub course_id: CourseId,
    pub title: String,
    pub completed: usize,
    pub total: usize,
    pub fraction: f32,
    pub last_accessed_at: DateTime<Utc>,
}

/// Everything the student dashboard renders in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub courses: Vec<CourseProgressItem>,
    pub lessons_completed: usize,
    pub mean_completion: f32,
    pub unread_notifications: usize,
    pub upcoming_events: Vec<CalendarEvent>,
}

/// Aggregates progress, notifications, and calendar data per student.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
    notifications: Arc<dyn NotificationRepository>,
    events: Arc<dyn EventRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        progress: Arc<dyn ProgressRepository>,
        notifications: Arc<dyn NotificationRepository>,
        events: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            progress,
            notifications,
            events,
        }
    }

    /// Build the dashboard for one student.
    ///
    /// Progress rows are ordered by most recent activity; events are the
    /// next few from today on.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` on storage failures.
    pub async fn overview(&self, student_id: UserId) -> Result<DashboardOverview, DashboardError> {
        let now = self.clock.now();

        let mut courses = Vec::new();
        let mut lessons_completed = 0;
        for progress in self.progress.list_for_student(student_id).await? {
            let course = self.courses.get_course(progress.course_id()).await?;
            lessons_completed += progress.completed_count();
            courses.push(CourseProgressItem {
                course_id: course.id(),
                title: course.title().to_owned(),
                completed: progress.completed_count(),
                total: course.lesson_count(),
                fraction: progress.fraction(&course),
                last_accessed_at: progress.last_accessed_at(),
            });
        }
        courses.sort_by_key(|c| std::cmp::Reverse(c.last_accessed_at));

        #[allow(clippy::cast_precision_loss)]
        let mean_completion = if courses.is_empty() {
            0.0
        } else {
            courses.iter().map(|c| c.fraction).sum::<f32>() / courses.len() as f32
        };

        let unread_notifications = self
            .notifications
            .list_for_user(student_id)
            .await?
            .iter()
            .filter(|n| !n.is_read())
            .count();

        let mut upcoming_events: Vec<_> = self
            .events
            .list_events()
            .await?
            .into_iter()
            .filter(|e| e.is_upcoming(now))
            .collect();
        upcoming_events.sort_by_key(CalendarEvent::date);
        upcoming_events.truncate(UPCOMING_EVENT_LIMIT);

        Ok(DashboardOverview {
            courses,
            lessons_completed,
            mean_completion,
            unread_notifications,
            upcoming_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::time::{fixed_clock, fixed_now};
    use storage::fixtures::{ids, seed_demo};
    use storage::repository::Storage;

    async fn seeded_dashboard() -> DashboardService {
        let storage = Storage::in_memory();
        seed_demo(&storage, fixed_now()).await.unwrap();
        DashboardService::new(
            fixed_clock(),
            Arc::clone(&storage.courses),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.notifications),
            Arc::clone(&storage.events),
        )
    }

    #[tokio::test]
    async fn overview_aggregates_seeded_state() {
        let dashboard = seeded_dashboard().await;
        let overview = dashboard.overview(ids::STUDENT_ANA).await.unwrap();

        assert_eq!(overview.courses.len(), 1);
        let web = &overview.courses[0];
        assert_eq!(web.course_id, ids::COURSE_WEB);
        assert_eq!(web.completed, 2);
        assert_eq!(web.total, 4);

        assert_eq!(overview.lessons_completed, 2);
        assert!((overview.mean_completion - 0.5).abs() < f32::EPSILON);
        assert_eq!(overview.unread_notifications, 1);

        // Two of the three seeded events are in the future.
        assert_eq!(overview.upcoming_events.len(), 2);
        assert!(overview.upcoming_events[0].date() <= overview.upcoming_events[1].date());
    }

    #[tokio::test]
    async fn overview_for_unenrolled_student_is_empty() {
        let dashboard = seeded_dashboard().await;
        let overview = dashboard.overview(UserId::new(6)).await.unwrap();
        assert!(overview.courses.is_empty());
        assert_eq!(overview.mean_completion, 0.0);
        assert_eq!(overview.lessons_completed, 0);
    }
}
