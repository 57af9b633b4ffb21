use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{CourseId, ReplyId, ThreadId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForumError {
    #[error("thread title cannot be empty")]
    EmptyTitle,

    #[error("post body cannot be empty")]
    EmptyBody,
}

/// A reply within a forum thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumReply {
    id: ReplyId,
    author_id: UserId,
    body: String,
    created_at: DateTime<Utc>,
}

impl ForumReply {
    /// # Errors
    ///
    /// Returns `ForumError::EmptyBody` for a blank body.
    pub fn new(
        id: ReplyId,
        author_id: UserId,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ForumError> {
        let body = body.into().trim().to_owned();
        if body.is_empty() {
            return Err(ForumError::EmptyBody);
        }

        Ok(Self {
            id,
            author_id,
            body,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> ReplyId {
        self.id
    }

    #[must_use]
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A discussion thread attached to a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumThread {
    id: ThreadId,
    course_id: CourseId,
    author_id: UserId,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
    replies: Vec<ForumReply>,
}

impl ForumThread {
    /// Creates a thread with no replies.
    ///
    /// # Errors
    ///
    /// Returns `ForumError` for a blank title or body.
    pub fn new(
        id: ThreadId,
        course_id: CourseId,
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ForumError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(ForumError::EmptyTitle);
        }
        let body = body.into().trim().to_owned();
        if body.is_empty() {
            return Err(ForumError::EmptyBody);
        }

        Ok(Self {
            id,
            course_id,
            author_id,
            title,
            body,
            created_at,
            replies: Vec::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> ThreadId {
        self.id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn replies(&self) -> &[ForumReply] {
        &self.replies
    }

    #[must_use]
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Append a reply to the thread.
    pub fn push_reply(&mut self, reply: ForumReply) {
        self.replies.push(reply);
    }
}
