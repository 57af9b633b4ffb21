use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use campus_core::model::{
    Assessment, AssessmentAttempt, AssessmentId, AttemptId, CalendarEvent, Course, CourseId,
    CourseProgress, EventId, ForumThread, Notification, NotificationId, ThreadId, User, UserId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist or update a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user cannot be stored.
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError>;

    /// Fetch a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_user(&self, id: UserId) -> Result<User, StorageError>;

    /// All users, unordered.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist or update a course with its full module tree.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_course(&self, id: CourseId) -> Result<Course, StorageError>;

    /// All courses regardless of publication state, unordered.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;
}

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Persist or update an assessment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the assessment cannot be stored.
    async fn upsert_assessment(&self, assessment: &Assessment) -> Result<(), StorageError>;

    /// Fetch an assessment by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_assessment(&self, id: AssessmentId) -> Result<Assessment, StorageError>;

    /// Assessments attached to a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_for_course(&self, course_id: CourseId) -> Result<Vec<Assessment>, StorageError>;
}

#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Append a submitted attempt. Attempts are write-once.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the attempt id already exists.
    async fn append_attempt(&self, attempt: &AssessmentAttempt) -> Result<(), StorageError>;

    /// Fetch one attempt by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_attempt(&self, id: AttemptId) -> Result<AssessmentAttempt, StorageError>;

    /// Attempts of one student at one assessment, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_attempts(
        &self,
        assessment_id: AssessmentId,
        student_id: UserId,
    ) -> Result<Vec<AssessmentAttempt>, StorageError>;
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Persist or update a progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_progress(&self, progress: &CourseProgress) -> Result<(), StorageError>;

    /// Progress of one student in one course; `None` before enrollment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_progress(
        &self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<CourseProgress>, StorageError>;

    /// Every course the student has started.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_for_student(
        &self,
        student_id: UserId,
    ) -> Result<Vec<CourseProgress>, StorageError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist or update a notification (updates carry the read flag).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the notification cannot be stored.
    async fn upsert_notification(&self, notification: &Notification) -> Result<(), StorageError>;

    /// Fetch one notification by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_notification(&self, id: NotificationId) -> Result<Notification, StorageError>;

    /// All notifications addressed to a user, unordered.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, StorageError>;
}

#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// Persist or update a thread with its replies.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the thread cannot be stored.
    async fn upsert_thread(&self, thread: &ForumThread) -> Result<(), StorageError>;

    /// Fetch one thread by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_thread(&self, id: ThreadId) -> Result<ForumThread, StorageError>;

    /// All threads of a course, unordered.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_threads(&self, course_id: CourseId) -> Result<Vec<ForumThread>, StorageError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist or update a calendar event.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the event cannot be stored.
    async fn upsert_event(&self, event: &CalendarEvent) -> Result<(), StorageError>;

    /// All calendar events, unordered.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_events(&self) -> Result<Vec<CalendarEvent>, StorageError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

/// The in-memory store behind every repository trait.
///
/// This is the production backend: the platform serves all data from
/// seeded fixtures and persists nothing across runs. It doubles as the
/// test store.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    assessments: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
    attempts: Arc<Mutex<Vec<AssessmentAttempt>>>,
    progress: Arc<Mutex<HashMap<(UserId, CourseId), CourseProgress>>>,
    notifications: Arc<Mutex<HashMap<NotificationId, Notification>>>,
    threads: Arc<Mutex<HashMap<ThreadId, ForumThread>>>,
    events: Arc<Mutex<HashMap<EventId, CalendarEvent>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
) -> Result<std::sync::MutexGuard<'a, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError> {
        lock(&self.users)?.insert(user.id(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<User, StorageError> {
        lock(&self.users)?
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        Ok(lock(&self.users)?.values().cloned().collect())
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        lock(&self.courses)?.insert(course.id(), course.clone());
        Ok(())
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, StorageError> {
        lock(&self.courses)?
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        Ok(lock(&self.courses)?.values().cloned().collect())
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryRepository {
    async fn upsert_assessment(&self, assessment: &Assessment) -> Result<(), StorageError> {
        lock(&self.assessments)?.insert(assessment.id(), assessment.clone());
        Ok(())
    }

    async fn get_assessment(&self, id: AssessmentId) -> Result<Assessment, StorageError> {
        lock(&self.assessments)?
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_for_course(&self, course_id: CourseId) -> Result<Vec<Assessment>, StorageError> {
        Ok(lock(&self.assessments)?
            .values()
            .filter(|a| a.course_id() == course_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: &AssessmentAttempt) -> Result<(), StorageError> {
        let mut guard = lock(&self.attempts)?;
        if guard.iter().any(|a| a.id() == attempt.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(attempt.clone());
        Ok(())
    }

    async fn get_attempt(&self, id: AttemptId) -> Result<AssessmentAttempt, StorageError> {
        lock(&self.attempts)?
            .iter()
            .find(|a| a.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_attempts(
        &self,
        assessment_id: AssessmentId,
        student_id: UserId,
    ) -> Result<Vec<AssessmentAttempt>, StorageError> {
        let mut found: Vec<_> = lock(&self.attempts)?
            .iter()
            .filter(|a| a.assessment_id() == assessment_id && a.student_id() == student_id)
            .cloned()
            .collect();
        found.sort_by_key(AssessmentAttempt::submitted_at);
        Ok(found)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn upsert_progress(&self, progress: &CourseProgress) -> Result<(), StorageError> {
        lock(&self.progress)?.insert(
            (progress.student_id(), progress.course_id()),
            progress.clone(),
        );
        Ok(())
    }

    async fn get_progress(
        &self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<CourseProgress>, StorageError> {
        Ok(lock(&self.progress)?.get(&(student_id, course_id)).cloned())
    }

    async fn list_for_student(
        &self,
        student_id: UserId,
    ) -> Result<Vec<CourseProgress>, StorageError> {
        Ok(lock(&self.progress)?
            .values()
            .filter(|p| p.student_id() == student_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryRepository {
    async fn upsert_notification(&self, notification: &Notification) -> Result<(), StorageError> {
        lock(&self.notifications)?.insert(notification.id(), notification.clone());
        Ok(())
    }

    async fn get_notification(&self, id: NotificationId) -> Result<Notification, StorageError> {
        lock(&self.notifications)?
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, StorageError> {
        Ok(lock(&self.notifications)?
            .values()
            .filter(|n| n.user_id() == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ForumRepository for InMemoryRepository {
    async fn upsert_thread(&self, thread: &ForumThread) -> Result<(), StorageError> {
        lock(&self.threads)?.insert(thread.id(), thread.clone());
        Ok(())
    }

    async fn get_thread(&self, id: ThreadId) -> Result<ForumThread, StorageError> {
        lock(&self.threads)?
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_threads(&self, course_id: CourseId) -> Result<Vec<ForumThread>, StorageError> {
        Ok(lock(&self.threads)?
            .values()
            .filter(|t| t.course_id() == course_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn upsert_event(&self, event: &CalendarEvent) -> Result<(), StorageError> {
        lock(&self.events)?.insert(event.id(), event.clone());
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<CalendarEvent>, StorageError> {
        Ok(lock(&self.events)?.values().cloned().collect())
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates every repository behind trait objects so services depend on
/// contracts rather than the backend.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub assessments: Arc<dyn AssessmentRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub forums: Arc<dyn ForumRepository>,
    pub events: Arc<dyn EventRepository>,
}

impl Storage {
    /// Builds the aggregate over a single shared in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            users: Arc::new(repo.clone()),
            courses: Arc::new(repo.clone()),
            assessments: Arc::new(repo.clone()),
            attempts: Arc::new(repo.clone()),
            progress: Arc::new(repo.clone()),
            notifications: Arc::new(repo.clone()),
            forums: Arc::new(repo.clone()),
            events: Arc::new(repo),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
