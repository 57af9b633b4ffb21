use std::sync::{Arc, Mutex};
use std::time::Duration;

use campus_core::Clock;
use campus_core::model::{AnswerValue, AssessmentAttempt, AssessmentId, Question, UserId};
use storage::repository::{AssessmentRepository, AttemptRepository};

use crate::error::SessionError;

use super::progress::SessionSnapshot;
use super::session::{AssessmentSession, TickOutcome};
use super::ticker::{TickControl, Ticker, TickerGuard};

/// Cadence of the countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

struct ActiveSession {
    session: Arc<Mutex<AssessmentSession>>,
    guard: TickerGuard,
}

/// Orchestrates the assessment-taking flow end to end.
///
/// At most one session is active at a time. `begin` loads the assessment,
/// starts the session, and schedules the one-second tick through the
/// injected [`Ticker`]; `submit` hands the collected answers off to the
/// attempt repository and tears the schedule down. Dropping the runner
/// (the view going away) cancels the tick as well.
pub struct SessionRunner {
    clock: Clock,
    assessments: Arc<dyn AssessmentRepository>,
    attempts: Arc<dyn AttemptRepository>,
    ticker: Arc<dyn Ticker>,
    active: Option<ActiveSession>,
}

impl SessionRunner {
    #[must_use]
    pub fn new(
        clock: Clock,
        assessments: Arc<dyn AssessmentRepository>,
        attempts: Arc<dyn AttemptRepository>,
        ticker: Arc<dyn Ticker>,
    ) -> Self {
        Self {
            clock,
            assessments,
            attempts,
            ticker,
            active: None,
        }
    }

    /// Begin a session for `assessment_id`, after the student confirmed
    /// the start screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` while another session is
    /// running, `SessionError::Storage` if the assessment cannot be
    /// loaded, and the session constructor errors otherwise.
    pub async fn begin(
        &mut self,
        assessment_id: AssessmentId,
        student_id: UserId,
    ) -> Result<(), SessionError> {
        if let Some(active) = &self.active {
            let session = active
                .session
                .lock()
                .map_err(|_| SessionError::Poisoned)?;
            if !session.is_submitted() {
                return Err(SessionError::AlreadyStarted);
            }
            tracing::warn!(
                assessment = %session.assessment().id(),
                "discarding a submitted session that was never collected"
            );
        }
        self.active = None;

        let assessment = self.assessments.get_assessment(assessment_id).await?;
        let session =
            AssessmentSession::begin(Arc::new(assessment), student_id, self.clock.now())?;
        let remaining = session.remaining_secs();
        let session = Arc::new(Mutex::new(session));

        let tick_session = Arc::clone(&session);
        let tick_clock = self.clock;
        let guard = self.ticker.schedule(
            TICK_PERIOD,
            Box::new(move || {
                let Ok(mut session) = tick_session.lock() else {
                    return TickControl::Stop;
                };
                match session.tick(tick_clock.now()) {
                    TickOutcome::Running { .. } => TickControl::Continue,
                    TickOutcome::AutoSubmitted => {
                        tracing::info!(
                            assessment = %session.assessment().id(),
                            student = %session.student_id(),
                            "countdown expired, session auto-submitted"
                        );
                        TickControl::Stop
                    }
                    TickOutcome::AlreadySubmitted => TickControl::Stop,
                }
            }),
        );

        tracing::debug!(
            assessment = %assessment_id,
            student = %student_id,
            remaining_secs = remaining,
            "assessment session started"
        );
        self.active = Some(ActiveSession { session, guard });
        Ok(())
    }

    fn with_session<T>(
        &self,
        f: impl FnOnce(&mut AssessmentSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let Some(active) = &self.active else {
            return Err(SessionError::NoActiveSession);
        };
        let mut session = active
            .session
            .lock()
            .map_err(|_| SessionError::Poisoned)?;
        f(&mut session)
    }

    /// True while a session exists, submitted or not.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Record an answer for the question under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a running session.
    pub fn answer_current(&self, value: AnswerValue) -> Result<(), SessionError> {
        self.with_session(|s| s.answer_current(value))
    }

    /// Advance to the next question (saturating).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a running session.
    pub fn go_next(&self) -> Result<(), SessionError> {
        self.with_session(AssessmentSession::go_next)
    }

    /// Go back to the previous question (saturating).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a running session.
    pub fn go_previous(&self) -> Result<(), SessionError> {
        self.with_session(AssessmentSession::go_previous)
    }

    /// Jump to a question by index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a running session,
    /// or `SessionError::OutOfRange` for a bad index.
    pub fn jump_to(&self, index: usize) -> Result<(), SessionError> {
        self.with_session(|s| s.jump_to(index))
    }

    /// The question currently on screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a session.
    pub fn current_question(&self) -> Result<Question, SessionError> {
        self.with_session(|s| s.current_question().cloned())
    }

    /// Read model for the quiz screen, available until the session is
    /// collected by `submit` or dropped by `abandon`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a session.
    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.with_session(|s| Ok(s.snapshot()))
    }

    /// Submit the session and hand the attempt to the results
    /// collaborator.
    ///
    /// Idempotent at every layer: with no session this is a no-op
    /// returning `None`; on a session the timer already submitted, the
    /// original expiry submission is what gets collected. The persisted
    /// attempt is returned for the results screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when persisting the attempt fails;
    /// the session stays in place so the call can be retried.
    pub async fn submit(&mut self) -> Result<Option<AssessmentAttempt>, SessionError> {
        let attempt = {
            let Some(active) = &self.active else {
                return Ok(None);
            };
            let mut session = active
                .session
                .lock()
                .map_err(|_| SessionError::Poisoned)?;
            session.submit(self.clock.now());
            session.build_attempt()?
        };

        self.attempts.append_attempt(&attempt).await?;
        if let Some(active) = self.active.take() {
            active.guard.cancel();
        }

        tracing::info!(
            attempt = %attempt.id(),
            assessment = %attempt.assessment_id(),
            kind = ?attempt.submission(),
            answered = attempt.answered_count(),
            "assessment attempt recorded"
        );
        Ok(Some(attempt))
    }

    /// Tear the session down without handing anything off: the student
    /// navigated away. Cancels the scheduled tick.
    pub fn abandon(&mut self) {
        if let Some(active) = self.active.take() {
            active.guard.cancel();
            tracing::debug!("assessment session abandoned");
        }
    }
}

impl std::fmt::Debug for SessionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRunner")
            .field("active", &self.active.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
