use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use campus_core::Clock;
use campus_core::model::{Notification, NotificationId, NotificationKind, UserId};
use storage::repository::NotificationRepository;

use crate::error::NotificationServiceError;

// Fixture ids stay well below this, so minted ids never collide with
// seeded data.
const FIRST_MINTED_ID: u64 = 10_000;

/// The notification feed: push, list, and read-state handling.
pub struct NotificationService {
    clock: Clock,
    repo: Arc<dyn NotificationRepository>,
    next_id: AtomicU64,
}

impl NotificationService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn NotificationRepository>) -> Self {
        Self {
            clock,
            repo,
            next_id: AtomicU64::new(FIRST_MINTED_ID),
        }
    }

    fn mint_id(&self) -> NotificationId {
        NotificationId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Push a notification to a user's feed.
    ///
    /// # Errors
    ///
    /// Returns `NotificationServiceError` for an invalid title or a
    /// storage failure.
    pub async fn push(
        &self,
        user_id: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        link: Option<String>,
    ) -> Result<Notification, NotificationServiceError> {
        let mut notification =
            Notification::new(self.mint_id(), user_id, title, message, kind, self.clock.now())?;
        if let Some(link) = link {
            notification = notification.with_link(link);
        }
        self.repo.upsert_notification(&notification).await?;
        tracing::debug!(%user_id, id = %notification.id(), "notification pushed");
        Ok(notification)
    }

    /// The user's feed, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotificationServiceError::Storage` on storage failures.
    pub async fn inbox(&self, user_id: UserId) -> Result<Vec<Notification>, NotificationServiceError> {
        let mut inbox = self.repo.list_for_user(user_id).await?;
        inbox.sort_by_key(|n| std::cmp::Reverse(n.created_at()));
        Ok(inbox)
    }

    /// Number of unread notifications, for the navbar badge.
    ///
    /// # Errors
    ///
    /// Returns `NotificationServiceError::Storage` on storage failures.
    pub async fn unread_count(&self, user_id: UserId) -> Result<usize, NotificationServiceError> {
        Ok(self
            .repo
            .list_for_user(user_id)
            .await?
            .iter()
            .filter(|n| !n.is_read())
            .count())
    }

    /// Mark one notification as read.
    ///
    /// # Errors
    ///
    /// Returns `NotificationServiceError::Storage` with `NotFound` for an
    /// unknown id.
    pub async fn mark_read(&self, id: NotificationId) -> Result<(), NotificationServiceError> {
        let mut notification = self.repo.get_notification(id).await?;
        notification.mark_read();
        self.repo.upsert_notification(&notification).await?;
        Ok(())
    }

    /// Mark the whole feed as read.
    ///
    /// # Errors
    ///
    /// Returns `NotificationServiceError::Storage` on storage failures.
    pub async fn mark_all_read(&self, user_id: UserId) -> Result<(), NotificationServiceError> {
        for mut notification in self.repo.list_for_user(user_id).await? {
            if !notification.is_read() {
                notification.mark_read();
                self.repo.upsert_notification(&notification).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::time::{fixed_clock, fixed_now};
    use storage::fixtures::{ids, seed_demo};
    use storage::repository::Storage;

    async fn seeded_service() -> NotificationService {
        let storage = Storage::in_memory();
        seed_demo(&storage, fixed_now()).await.unwrap();
        NotificationService::new(fixed_clock(), Arc::clone(&storage.notifications))
    }

    #[tokio::test]
    async fn inbox_is_newest_first() {
        let service = seeded_service().await;
        let inbox = service.inbox(ids::STUDENT_ANA).await.unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox[0].created_at() >= inbox[1].created_at());
    }

    #[tokio::test]
    async fn push_then_unread_count() {
        let service = seeded_service().await;
        assert_eq!(service.unread_count(ids::STUDENT_ANA).await.unwrap(), 1);

        let pushed = service
            .push(
                ids::STUDENT_ANA,
                "Forum reply",
                "Luis answered your thread.",
                NotificationKind::Info,
                Some("/forums/401".into()),
            )
            .await
            .unwrap();
        assert!(!pushed.is_read());
        assert_eq!(service.unread_count(ids::STUDENT_ANA).await.unwrap(), 2);

        service.mark_read(pushed.id()).await.unwrap();
        assert_eq!(service.unread_count(ids::STUDENT_ANA).await.unwrap(), 1);

        service.mark_all_read(ids::STUDENT_ANA).await.unwrap();
        assert_eq!(service.unread_count(ids::STUDENT_ANA).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn minted_ids_do_not_collide_with_fixtures() {
        let service = seeded_service().await;
        let pushed = service
            .push(
                ids::STUDENT_JORGE,
                "Hello",
                "",
                NotificationKind::Info,
                None,
            )
            .await
            .unwrap();
        assert!(pushed.id().value() >= 10_000);

        let inbox = service.inbox(ids::STUDENT_JORGE).await.unwrap();
        assert_eq!(inbox.len(), 2);
    }
}
