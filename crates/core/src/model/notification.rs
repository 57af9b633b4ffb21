use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{NotificationId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotificationError {
    #[error("notification title cannot be empty")]
    EmptyTitle,
}

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A message shown in a user's notification feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    id: NotificationId,
    user_id: UserId,
    title: String,
    message: String,
    kind: NotificationKind,
    read: bool,
    created_at: DateTime<Utc>,
    link: Option<String>,
}

impl Notification {
    /// Creates an unread notification.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::EmptyTitle` for a blank title.
    pub fn new(
        id: NotificationId,
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        created_at: DateTime<Utc>,
    ) -> Result<Self, NotificationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(NotificationError::EmptyTitle);
        }

        Ok(Self {
            id,
            user_id,
            title,
            message: message.into().trim().to_owned(),
            kind,
            read: false,
            created_at,
            link: None,
        })
    }

    /// Attach a navigation target shown alongside the message.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn notification_starts_unread() {
        let mut n = Notification::new(
            NotificationId::new(1),
            UserId::new(1),
            "New assessment available",
            "The HTML & CSS final is open until Friday.",
            NotificationKind::Info,
            fixed_now(),
        )
        .unwrap()
        .with_link("/assessments/1");

        assert!(!n.is_read());
        assert_eq!(n.link(), Some("/assessments/1"));

        n.mark_read();
        assert!(n.is_read());
    }

    #[test]
    fn notification_rejects_empty_title() {
        let err = Notification::new(
            NotificationId::new(1),
            UserId::new(1),
            " ",
            "body",
            NotificationKind::Warning,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, NotificationError::EmptyTitle);
    }
}
