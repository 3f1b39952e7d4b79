use quiz_core::model::Question;

/// Immutable view of the session handed to the renderer after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub started: bool,
    pub current_index: usize,
    pub total: usize,
    pub score: u32,
    pub question: Option<Question>,
    pub remaining_secs: u32,
    pub budget_secs: u32,
    pub selected_index: Option<usize>,
    pub locked: bool,
    pub explanation_visible: bool,
}

impl SessionSnapshot {
    /// One-based question number for display; 0 before the session starts.
    #[must_use]
    pub fn question_number(&self) -> usize {
        if self.started { self.current_index + 1 } else { 0 }
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.started && self.current_index + 1 >= self.total
    }

    /// Share of the budget already used, in `0.0..=1.0`.
    #[must_use]
    pub fn elapsed_fraction(&self) -> f32 {
        if self.budget_secs == 0 {
            return 1.0;
        }
        let used = self.budget_secs.saturating_sub(self.remaining_secs);
        #[allow(clippy::cast_precision_loss)]
        let fraction = used as f32 / self.budget_secs as f32;
        fraction.clamp(0.0, 1.0)
    }

    /// `Some(true)` for a correct selection, `None` when nothing was selected.
    #[must_use]
    pub fn answered_correctly(&self) -> Option<bool> {
        let selected = self.selected_index?;
        self.question.as_ref().map(|q| q.is_correct(selected))
    }
}
