use serde::Serialize;

use campus_core::model::QuestionId;

/// Per-question cell of the navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionState {
    pub question_id: QuestionId,
    pub answered: bool,
    pub is_current: bool,
}

/// Read model of a running (or just-submitted) session, sized for the
/// quiz screen: header counters, countdown display, and the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub current_index: usize,
    pub total_questions: usize,
    pub answered: usize,
    pub remaining_secs: u32,
    pub is_submitted: bool,
    pub questions: Vec<QuestionState>,
}

impl SessionSnapshot {
    /// Answered fraction in 0.0..=1.0 for the progress bar.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f32 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.answered as f32 / self.total_questions as f32
    }

    /// Remaining time as the `M:SS` string the header shows.
    #[must_use]
    pub fn remaining_display(&self) -> String {
        let minutes = self.remaining_secs / 60;
        let seconds = self.remaining_secs % 60;
        format!("{minutes}:{seconds:02}")
    }
}
