use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::answer::AnswerValue;
use crate::model::ids::{AssessmentId, AttemptId, QuestionId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("submitted_at is before started_at")]
    InvalidTimeRange,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// How a session reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    /// The student pressed "finish".
    Manual,
    /// The countdown reached zero and submitted on the student's behalf.
    TimerExpired,
}

/// One answer as it left the session's answer sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub value: AnswerValue,
}

/// The record handed off when an assessment session submits.
///
/// Carries exactly what the session collected: answers, timestamps, and how
/// submission happened. Scoring is somebody else's job and no score is
/// stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentAttempt {
    id: AttemptId,
    assessment_id: AssessmentId,
    student_id: UserId,
    started_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
    submission: SubmissionKind,
    answers: Vec<SubmittedAnswer>,
}

impl AssessmentAttempt {
    /// Creates an attempt record with a freshly minted id.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if `submitted_at` precedes
    /// `started_at`.
    pub fn new(
        assessment_id: AssessmentId,
        student_id: UserId,
        started_at: DateTime<Utc>,
        submitted_at: DateTime<Utc>,
        submission: SubmissionKind,
        answers: Vec<SubmittedAnswer>,
    ) -> Result<Self, AttemptError> {
        if submitted_at < started_at {
            return Err(AttemptError::InvalidTimeRange);
        }

        Ok(Self {
            id: AttemptId::generate(),
            assessment_id,
            student_id,
            started_at,
            submitted_at,
            submission,
            answers,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> AttemptId {
        self.id
    }

    #[must_use]
    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
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
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn submission(&self) -> SubmissionKind {
        self.submission
    }

    #[must_use]
    pub fn answers(&self) -> &[SubmittedAnswer] {
        &self.answers
    }

    /// Number of questions that received an answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// The answer recorded for a question, if any.
    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| &a.value)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::OptionId;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn attempt_rejects_inverted_times() {
        let started = fixed_now();
        let err = AssessmentAttempt::new(
            AssessmentId::new(1),
            UserId::new(1),
            started,
            started - Duration::seconds(1),
            SubmissionKind::Manual,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, AttemptError::InvalidTimeRange);
    }

    #[test]
    fn attempt_exposes_answers() {
        let started = fixed_now();
        let attempt = AssessmentAttempt::new(
            AssessmentId::new(1),
            UserId::new(7),
            started,
            started + Duration::seconds(60),
            SubmissionKind::TimerExpired,
            vec![
                SubmittedAnswer {
                    question_id: QuestionId::new(1),
                    value: AnswerValue::choice(OptionId::new(2)),
                },
                SubmittedAnswer {
                    question_id: QuestionId::new(2),
                    value: AnswerValue::text("true"),
                },
            ],
        )
        .unwrap();

        assert_eq!(attempt.answered_count(), 2);
        assert_eq!(attempt.submission(), SubmissionKind::TimerExpired);
        assert_eq!(
            attempt.answer_for(QuestionId::new(1)),
            Some(&AnswerValue::choice(OptionId::new(2)))
        );
        assert_eq!(attempt.answer_for(QuestionId::new(3)), None);
    }

    #[test]
    fn attempt_ids_are_unique() {
        let started = fixed_now();
        let build = || {
            AssessmentAttempt::new(
                AssessmentId::new(1),
                UserId::new(1),
                started,
                started,
                SubmissionKind::Manual,
                Vec::new(),
            )
            .unwrap()
        };
        assert_ne!(build().id(), build().id());
    }
}
