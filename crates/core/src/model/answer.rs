use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::OptionId;

/// The value a student submits for one question.
///
/// Choice questions store the selected option id, short-answer questions
/// store free text. Nothing checks that the variant matches the question's
/// kind; the quiz screen stores whatever the student last entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerValue {
    Choice(OptionId),
    Text(String),
}

impl AnswerValue {
    /// Free-text constructor that trims surrounding whitespace.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into().trim().to_owned())
    }

    /// Selected-option constructor.
    #[must_use]
    pub fn choice(option: OptionId) -> Self {
        Self::Choice(option)
    }

    /// Returns the selected option id, if this is a choice answer.
    #[must_use]
    pub fn as_choice(&self) -> Option<OptionId> {
        match self {
            AnswerValue::Choice(id) => Some(*id),
            AnswerValue::Text(_) => None,
        }
    }

    /// Returns the free text, if this is a text answer.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Choice(_) => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Choice(id) => write!(f, "option:{id}"),
            AnswerValue::Text(text) => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor_trims() {
        let value = AnswerValue::text("  an answer  ");
        assert_eq!(value.as_text(), Some("an answer"));
        assert_eq!(value.as_choice(), None);
    }

    #[test]
    fn choice_accessors() {
        let value = AnswerValue::choice(OptionId::new(3));
        assert_eq!(value.as_choice(), Some(OptionId::new(3)));
        assert_eq!(value.as_text(), None);
        assert_eq!(value.to_string(), "option:3");
    }
}
