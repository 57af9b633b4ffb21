use thiserror::Error;

use crate::model::{
    AssessmentError, AttemptError, CalendarError, CourseError, ForumError, NotificationError,
    UserError,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Forum(#[from] ForumError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
