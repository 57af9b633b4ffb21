//! Shared error types for the services crate.

use thiserror::Error;

use campus_core::model::{AttemptError, ForumError, NotificationError};
use storage::repository::StorageError;

/// Errors emitted by the assessment session subsystem.
///
/// Everything here is a local validation failure surfaced to the caller;
/// none of these are fatal and there is no retry policy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("time limit must be greater than zero seconds")]
    InvalidDuration,

    #[error("an assessment session is already active")]
    AlreadyStarted,

    #[error("no active assessment session")]
    NoActiveSession,

    #[error("question index {index} is out of range for {count} questions")]
    OutOfRange { index: usize, count: usize },

    #[error("assessment has no questions")]
    EmptyAssessment,

    #[error("session state lock was poisoned")]
    Poisoned,

    #[error(transparent)]
    Attempt(#[from] AttemptError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LearningService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LearningError {
    #[error("lesson does not belong to the course")]
    UnknownLesson,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NotificationService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotificationServiceError {
    #[error(transparent)]
    Invalid(#[from] NotificationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ForumService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ForumServiceError {
    #[error(transparent)]
    Invalid(#[from] ForumError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
