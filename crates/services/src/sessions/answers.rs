use std::collections::HashMap;

use campus_core::model::{AnswerValue, QuestionId};

/// The answers collected during one session.
///
/// A plain question-id → value map: a later write for the same question
/// replaces the earlier one, and only presence matters for progress
/// counts. Values are not checked against the question's kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: HashMap<QuestionId, AnswerValue>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the answer for a question.
    pub fn record(&mut self, question_id: QuestionId, value: AnswerValue) {
        self.answers.insert(question_id, value);
    }

    /// The stored answer, or `None` while unanswered.
    #[must_use]
    pub fn answer(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.answers.get(&question_id)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.answers.contains_key(&question_id)
    }

    /// Number of distinct questions with a stored answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Drain the sheet into `(question, value)` pairs following the given
    /// question order, skipping unanswered questions.
    #[must_use]
    pub fn in_order(&self, order: &[QuestionId]) -> Vec<(QuestionId, AnswerValue)> {
        order
            .iter()
            .filter_map(|id| self.answers.get(id).map(|value| (*id, value.clone())))
            .collect()
    }
}
