use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{AssessmentId, CourseId, OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("assessment title cannot be empty")]
    EmptyTitle,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("time limit must be greater than zero minutes")]
    InvalidTimeLimit,

    #[error("allowed attempts must be greater than zero")]
    InvalidAllowedAttempts,

    #[error("availability window closes before it opens")]
    InvalidWindow,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// The three question shapes the quiz screen can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    SingleChoice,
    TrueFalse,
    ShortAnswer,
}

/// One selectable option of a choice-type question.
///
/// Every choice question is expected to carry exactly one option with
/// `is_correct` set; construction does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    id: OptionId,
    text: String,
    is_correct: bool,
}

impl ChoiceOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn id(&self) -> OptionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

/// A single assessment question.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    kind: QuestionKind,
    points: u32,
    options: Vec<ChoiceOption>,
}

impl Question {
    /// Creates a question.
    ///
    /// Options are only meaningful for choice kinds; a short-answer
    /// question simply carries none.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::EmptyPrompt` for a blank prompt.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        kind: QuestionKind,
        points: u32,
        options: Vec<ChoiceOption>,
    ) -> Result<Self, AssessmentError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(AssessmentError::EmptyPrompt);
        }

        Ok(Self {
            id,
            prompt,
            kind,
            points,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }
}

//
// ─── ASSESSMENT ────────────────────────────────────────────────────────────────
//

/// A timed quiz attached to a course.
///
/// Immutable once loaded for a session: the session layer shares it
/// read-only and never writes back.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    id: AssessmentId,
    course_id: CourseId,
    title: String,
    description: String,
    time_limit_mins: u32,
    allowed_attempts: u32,
    opens_at: Option<DateTime<Utc>>,
    closes_at: Option<DateTime<Utc>>,
    questions: Vec<Question>,
}

impl Assessment {
    /// Creates an assessment.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError` for a blank title, a zero time limit,
    /// zero allowed attempts, or a window that closes before it opens.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AssessmentId,
        course_id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        time_limit_mins: u32,
        allowed_attempts: u32,
        window: (Option<DateTime<Utc>>, Option<DateTime<Utc>>),
        questions: Vec<Question>,
    ) -> Result<Self, AssessmentError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(AssessmentError::EmptyTitle);
        }
        if time_limit_mins == 0 {
            return Err(AssessmentError::InvalidTimeLimit);
        }
        if allowed_attempts == 0 {
            return Err(AssessmentError::InvalidAllowedAttempts);
        }
        let (opens_at, closes_at) = window;
        if let (Some(opens), Some(closes)) = (opens_at, closes_at) {
            if closes < opens {
                return Err(AssessmentError::InvalidWindow);
            }
        }

        Ok(Self {
            id,
            course_id,
            title,
            description: description.into().trim().to_owned(),
            time_limit_mins,
            allowed_attempts,
            opens_at,
            closes_at,
            questions,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> AssessmentId {
        self.id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn time_limit_mins(&self) -> u32 {
        self.time_limit_mins
    }

    /// Time limit expressed in seconds, the unit the countdown runs in.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_mins.saturating_mul(60)
    }

    #[must_use]
    pub fn allowed_attempts(&self) -> u32 {
        self.allowed_attempts
    }

    #[must_use]
    pub fn opens_at(&self) -> Option<DateTime<Utc>> {
        self.opens_at
    }

    #[must_use]
    pub fn closes_at(&self) -> Option<DateTime<Utc>> {
        self.closes_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Question at `index`, if within bounds.
    #[must_use]
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Sum of points across all questions.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(Question::points).sum()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
