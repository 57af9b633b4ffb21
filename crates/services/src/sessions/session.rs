use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use campus_core::model::{
    AnswerValue, Assessment, AssessmentAttempt, Question, SubmissionKind, SubmittedAnswer, UserId,
};

use crate::error::SessionError;

use super::answers::AnswerSheet;
use super::cursor::QuestionCursor;
use super::progress::{QuestionState, SessionSnapshot};
use super::timer::{CountdownTimer, TimerTick};

/// What a one-second tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running; the new remaining time is attached.
    Running { remaining_secs: u32 },
    /// This tick expired the countdown and the session submitted itself.
    /// Reported exactly once per session.
    AutoSubmitted,
    /// The session was already submitted; the tick was a no-op.
    AlreadySubmitted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One in-progress attempt at a timed assessment.
///
/// Composes the countdown, the answer sheet, and the question cursor over
/// a shared read-only `Assessment`. All mutation goes through these
/// methods; once submitted (by hand or by expiry) the session is terminal
/// and every mutating call fails with `NoActiveSession`.
pub struct AssessmentSession {
    assessment: Arc<Assessment>,
    student_id: UserId,
    timer: CountdownTimer,
    cursor: QuestionCursor,
    answers: AnswerSheet,
    started_at: DateTime<Utc>,
    submitted: Option<(DateTime<Utc>, SubmissionKind)>,
}

impl AssessmentSession {
    /// Starts a session: full countdown armed, cursor at question 0,
    /// empty answer sheet.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyAssessment` when there are no
    /// questions, or `SessionError::InvalidDuration` when the time limit
    /// works out to zero seconds.
    pub fn begin(
        assessment: Arc<Assessment>,
        student_id: UserId,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let count = assessment.question_count();
        if count == 0 {
            return Err(SessionError::EmptyAssessment);
        }

        let mut timer = CountdownTimer::new();
        timer.start(assessment.time_limit_secs())?;

        Ok(Self {
            assessment,
            student_id,
            timer,
            cursor: QuestionCursor::new(count),
            answers: AnswerSheet::new(),
            started_at,
            submitted: None,
        })
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.submitted.is_some() {
            return Err(SessionError::NoActiveSession);
        }
        Ok(())
    }

    // Accessors
    #[must_use]
    pub fn assessment(&self) -> &Arc<Assessment> {
        &self.assessment
    }

    #[must_use]
    pub fn student_id(&self) -> UserId {
        self.student_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn cursor_index(&self) -> usize {
        self.cursor.index()
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted.is_some()
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted.map(|(at, _)| at)
    }

    #[must_use]
    pub fn submission_kind(&self) -> Option<SubmissionKind> {
        self.submitted.map(|(_, kind)| kind)
    }

    /// The question under the cursor.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if the cursor somehow escaped
    /// the question list; the cursor construction makes that unreachable.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.assessment
            .question_at(self.cursor.index())
            .ok_or(SessionError::OutOfRange {
                index: self.cursor.index(),
                count: self.assessment.question_count(),
            })
    }

    /// The stored answer for the question under the cursor, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerValue> {
        self.assessment
            .question_at(self.cursor.index())
            .and_then(|q| self.answers.answer(q.id()))
    }

    // Commands

    /// Record `value` for the question under the cursor, replacing any
    /// earlier answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` after submission.
    pub fn answer_current(&mut self, value: AnswerValue) -> Result<(), SessionError> {
        self.ensure_active()?;
        let question_id = self.current_question()?.id();
        self.answers.record(question_id, value);
        Ok(())
    }

    /// Move to the next question; silently stays at the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` after submission.
    pub fn go_next(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.cursor.next();
        Ok(())
    }

    /// Move to the previous question; silently stays at question 0.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` after submission.
    pub fn go_previous(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.cursor.previous();
        Ok(())
    }

    /// Jump straight to a question from the navigation grid.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` after submission, or
    /// `SessionError::OutOfRange` for an invalid index.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.cursor.jump_to(index)
    }

    /// Advance the countdown by one second.
    ///
    /// When this tick crosses zero the session submits itself with
    /// `SubmissionKind::TimerExpired`; that outcome is reported exactly
    /// once. Ticking a submitted session is a harmless no-op, which is
    /// what resolves a tick racing a manual submit.
    pub fn tick(&mut self, at: DateTime<Utc>) -> TickOutcome {
        if self.is_submitted() {
            return TickOutcome::AlreadySubmitted;
        }
        match self.timer.tick() {
            TimerTick::Running { remaining_secs } => TickOutcome::Running { remaining_secs },
            TimerTick::JustExpired => {
                self.submitted = Some((at, SubmissionKind::TimerExpired));
                TickOutcome::AutoSubmitted
            }
            TimerTick::Noop => TickOutcome::AlreadySubmitted,
        }
    }

    /// Submit manually. Idempotent: the first transition wins and a
    /// second call (or a call racing the timer's auto-submit) changes
    /// nothing.
    ///
    /// Returns true when this call performed the transition.
    pub fn submit(&mut self, at: DateTime<Utc>) -> bool {
        if self.submitted.is_some() {
            return false;
        }
        self.submitted = Some((at, SubmissionKind::Manual));
        true
    }

    /// Build the handoff record for the results collaborator.
    ///
    /// The attempt carries the collected answers in assessment order plus
    /// timestamps and the submission kind; no scoring happens here.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` if the session has not
    /// been submitted yet.
    pub fn build_attempt(&self) -> Result<AssessmentAttempt, SessionError> {
        let Some((submitted_at, kind)) = self.submitted else {
            return Err(SessionError::NoActiveSession);
        };

        let order: Vec<_> = self.assessment.questions().iter().map(Question::id).collect();
        let answers = self
            .answers
            .in_order(&order)
            .into_iter()
            .map(|(question_id, value)| SubmittedAnswer { question_id, value })
            .collect();

        Ok(AssessmentAttempt::new(
            self.assessment.id(),
            self.student_id,
            self.started_at,
            submitted_at,
            kind,
            answers,
        )?)
    }

    /// Read model for the quiz screen.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let questions = self
            .assessment
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionState {
                question_id: q.id(),
                answered: self.answers.is_answered(q.id()),
                is_current: i == self.cursor.index(),
            })
            .collect();

        SessionSnapshot {
            current_index: self.cursor.index(),
            total_questions: self.assessment.question_count(),
            answered: self.answers.answered_count(),
            remaining_secs: self.timer.remaining_secs(),
            is_submitted: self.is_submitted(),
            questions,
        }
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("assessment_id", &self.assessment.id())
            .field("student_id", &self.student_id)
            .field("cursor", &self.cursor.index())
            .field("answered", &self.answers.answered_count())
            .field("remaining_secs", &self.timer.remaining_secs())
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::model::{
        Assessment, AssessmentId, ChoiceOption, CourseId, OptionId, QuestionId, QuestionKind,
    };
    use campus_core::time::fixed_now;

    fn three_question_assessment(time_limit_mins: u32) -> Arc<Assessment> {
        let questions = vec![
            Question::new(
                QuestionId::new(1),
                "Which tag creates a hyperlink?",
                QuestionKind::SingleChoice,
                1,
                vec![
                    ChoiceOption::new(OptionId::new(11), "<a>", true),
                    ChoiceOption::new(OptionId::new(12), "<link>", false),
                ],
            )
            .unwrap(),
            Question::new(
                QuestionId::new(2),
                "CSS stands for Cascading Style Sheets.",
                QuestionKind::TrueFalse,
                1,
                vec![
                    ChoiceOption::new(OptionId::new(21), "True", true),
                    ChoiceOption::new(OptionId::new(22), "False", false),
                ],
            )
            .unwrap(),
            Question::new(
                QuestionId::new(3),
                "Explain specificity.",
                QuestionKind::ShortAnswer,
                2,
                Vec::new(),
            )
            .unwrap(),
        ];
        Arc::new(
            Assessment::new(
                AssessmentId::new(1),
                CourseId::new(1),
                "Quiz",
                "",
                time_limit_mins,
                2,
                (None, None),
                questions,
            )
            .unwrap(),
        )
    }

    fn begin(time_limit_mins: u32) -> AssessmentSession {
        AssessmentSession::begin(
            three_question_assessment(time_limit_mins),
            UserId::new(4),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn begin_arms_full_countdown() {
        let session = begin(1);
        assert_eq!(session.remaining_secs(), 60);
        assert_eq!(session.cursor_index(), 0);
        assert_eq!(session.answered_count(), 0);
        assert!(!session.is_submitted());
    }

    #[test]
    fn begin_rejects_empty_assessment() {
        let empty = Arc::new(
            Assessment::new(
                AssessmentId::new(9),
                CourseId::new(1),
                "Empty",
                "",
                10,
                1,
                (None, None),
                Vec::new(),
            )
            .unwrap(),
        );
        let err = AssessmentSession::begin(empty, UserId::new(4), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::EmptyAssessment));
    }

    #[test]
    fn full_minute_of_ticks_auto_submits() {
        // 3 questions, 1 minute: answer q1 and q2, let the clock run out.
        let mut session = begin(1);
        assert_eq!(session.remaining_secs(), 60);

        session
            .answer_current(AnswerValue::choice(OptionId::new(11)))
            .unwrap();
        session.go_next().unwrap();
        session
            .answer_current(AnswerValue::text("true"))
            .unwrap();
        session.go_next().unwrap();

        let mut auto_submits = 0;
        for _ in 0..60 {
            if session.tick(fixed_now()) == TickOutcome::AutoSubmitted {
                auto_submits += 1;
            }
        }
        assert_eq!(auto_submits, 1);
        assert!(session.is_submitted());
        assert_eq!(session.submission_kind(), Some(SubmissionKind::TimerExpired));

        let attempt = session.build_attempt().unwrap();
        assert_eq!(attempt.answered_count(), 2);
        assert_eq!(
            attempt.answer_for(QuestionId::new(1)),
            Some(&AnswerValue::choice(OptionId::new(11)))
        );
        assert_eq!(
            attempt.answer_for(QuestionId::new(2)),
            Some(&AnswerValue::text("true"))
        );
        assert_eq!(attempt.answer_for(QuestionId::new(3)), None);
    }

    #[test]
    fn ticks_after_submission_are_noops() {
        let mut session = begin(1);
        assert!(session.submit(fixed_now()));

        for _ in 0..5 {
            assert_eq!(session.tick(fixed_now()), TickOutcome::AlreadySubmitted);
        }
        // The countdown froze where it was.
        assert_eq!(session.remaining_secs(), 60);
    }

    #[test]
    fn submit_is_idempotent_and_freezes_answers() {
        let mut session = begin(1);
        session
            .answer_current(AnswerValue::choice(OptionId::new(11)))
            .unwrap();

        assert!(session.submit(fixed_now()));
        assert!(!session.submit(fixed_now()));
        assert_eq!(session.submission_kind(), Some(SubmissionKind::Manual));

        // No further writes are accepted.
        let err = session
            .answer_current(AnswerValue::text("late"))
            .unwrap_err();
        assert!(matches!(err, SessionError::NoActiveSession));
        let err = session.go_next().unwrap_err();
        assert!(matches!(err, SessionError::NoActiveSession));

        let attempt = session.build_attempt().unwrap();
        assert_eq!(attempt.answered_count(), 1);
    }

    #[test]
    fn manual_submit_beats_racing_tick() {
        let mut session = begin(1);
        // Run the timer down to its final second.
        for _ in 0..59 {
            session.tick(fixed_now());
        }
        assert_eq!(session.remaining_secs(), 1);

        // The click lands first; the expiring tick becomes a no-op.
        assert!(session.submit(fixed_now()));
        assert_eq!(session.tick(fixed_now()), TickOutcome::AlreadySubmitted);
        assert_eq!(session.submission_kind(), Some(SubmissionKind::Manual));
    }

    #[test]
    fn navigation_saturates_and_jump_checks_bounds() {
        let mut session = begin(1);
        session.go_previous().unwrap();
        assert_eq!(session.cursor_index(), 0);

        session.go_next().unwrap();
        session.go_next().unwrap();
        session.go_next().unwrap();
        assert_eq!(session.cursor_index(), 2);

        let err = session.jump_to(5).unwrap_err();
        assert!(matches!(
            err,
            SessionError::OutOfRange { index: 5, count: 3 }
        ));
        assert_eq!(session.cursor_index(), 2);

        session.jump_to(1).unwrap();
        assert_eq!(session.cursor_index(), 1);
        assert_eq!(session.current_question().unwrap().id(), QuestionId::new(2));
    }

    #[test]
    fn answers_overwrite_per_question() {
        let mut session = begin(1);
        session
            .answer_current(AnswerValue::choice(OptionId::new(11)))
            .unwrap();
        session
            .answer_current(AnswerValue::choice(OptionId::new(12)))
            .unwrap();
        assert_eq!(session.answered_count(), 1);
        assert_eq!(
            session.current_answer(),
            Some(&AnswerValue::choice(OptionId::new(12)))
        );
    }

    #[test]
    fn snapshot_reflects_grid_state() {
        let mut session = begin(1);
        session
            .answer_current(AnswerValue::choice(OptionId::new(11)))
            .unwrap();
        session.go_next().unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.total_questions, 3);
        assert_eq!(snapshot.answered, 1);
        assert_eq!(snapshot.current_index, 1);
        assert!(snapshot.questions[0].answered);
        assert!(!snapshot.questions[0].is_current);
        assert!(snapshot.questions[1].is_current);
        assert!((snapshot.fraction() - 1.0 / 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn build_attempt_requires_submission() {
        let session = begin(1);
        assert!(matches!(
            session.build_attempt(),
            Err(SessionError::NoActiveSession)
        ));
    }
}
