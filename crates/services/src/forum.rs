use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use campus_core::Clock;
use campus_core::model::{CourseId, ForumReply, ForumThread, ReplyId, ThreadId, UserId};
use storage::repository::ForumRepository;

use crate::error::ForumServiceError;

// Fixture ids stay well below this, so minted ids never collide with
// seeded data.
const FIRST_MINTED_ID: u64 = 10_000;

/// Course discussion boards: threads and replies.
pub struct ForumService {
    clock: Clock,
    repo: Arc<dyn ForumRepository>,
    next_id: AtomicU64,
}

impl ForumService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn ForumRepository>) -> Self {
        Self {
            clock,
            repo,
            next_id: AtomicU64::new(FIRST_MINTED_ID),
        }
    }

    fn mint(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Threads of a course, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ForumServiceError::Storage` on storage failures.
    pub async fn course_threads(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<ForumThread>, ForumServiceError> {
        let mut threads = self.repo.list_threads(course_id).await?;
        threads.sort_by_key(|t| std::cmp::Reverse(t.created_at()));
        Ok(threads)
    }

    /// Open a new thread on a course board.
    ///
    /// # Errors
    ///
    /// Returns `ForumServiceError` for an empty title/body or a storage
    /// failure.
    pub async fn post_thread(
        &self,
        course_id: CourseId,
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<ForumThread, ForumServiceError> {
        let thread = ForumThread::new(
            ThreadId::new(self.mint()),
            course_id,
            author_id,
            title,
            body,
            self.clock.now(),
        )?;
        self.repo.upsert_thread(&thread).await?;
        tracing::debug!(%course_id, thread = %thread.id(), "forum thread posted");
        Ok(thread)
    }

    /// Reply to an existing thread; returns the updated thread.
    ///
    /// # Errors
    ///
    /// Returns `ForumServiceError` for an unknown thread, an empty body,
    /// or a storage failure.
    pub async fn post_reply(
        &self,
        thread_id: ThreadId,
        author_id: UserId,
        body: impl Into<String>,
    ) -> Result<ForumThread, ForumServiceError> {
        let mut thread = self.repo.get_thread(thread_id).await?;
        let reply = ForumReply::new(
            ReplyId::new(self.mint()),
            author_id,
            body,
            self.clock.now(),
        )?;
        thread.push_reply(reply);
        self.repo.upsert_thread(&thread).await?;
        Ok(thread)
    }
}
