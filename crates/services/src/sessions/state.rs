use quiz_core::model::{Question, QuestionId, SessionOrder};

/// Restart key for the countdown.
///
/// `epoch` increases on every `start()`, so a restarted session whose first
/// question happens to repeat still gets a fresh countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    Idle,
    Question { epoch: u64, id: QuestionId },
}

/// How the current question was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Selected(usize),
    TimedOut,
}

/// Per-question sub-state. A selection always locks; a reveal always follows a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnswerPhase {
    Answering,
    /// Selected and scored; the explanation is waiting for the reveal delay.
    Locked { selected: usize },
    Revealed(Resolution),
}

impl AnswerPhase {
    pub(crate) fn selected_index(self) -> Option<usize> {
        match self {
            AnswerPhase::Answering | AnswerPhase::Revealed(Resolution::TimedOut) => None,
            AnswerPhase::Locked { selected }
            | AnswerPhase::Revealed(Resolution::Selected(selected)) => Some(selected),
        }
    }

    pub(crate) fn is_locked(self) -> bool {
        !matches!(self, AnswerPhase::Answering)
    }

    pub(crate) fn explanation_visible(self) -> bool {
        matches!(self, AnswerPhase::Revealed(_))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub(crate) epoch: u64,
    pub(crate) order: SessionOrder,
    pub(crate) index: usize,
    pub(crate) score: u32,
    pub(crate) answer: AnswerPhase,
}

impl ActiveSession {
    pub(crate) fn current_question(&self) -> Option<&Question> {
        self.order.get(self.index)
    }

    pub(crate) fn is_last(&self) -> bool {
        self.index + 1 >= self.order.len()
    }

    pub(crate) fn timer_key(&self) -> TimerKey {
        match self.current_question() {
            Some(q) => TimerKey::Question {
                epoch: self.epoch,
                id: q.id(),
            },
            None => TimerKey::Idle,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) enum SessionPhase {
    #[default]
    NotStarted,
    InProgress(ActiveSession),
}

impl SessionPhase {
    pub(crate) fn active(&self) -> Option<&ActiveSession> {
        match self {
            SessionPhase::NotStarted => None,
            SessionPhase::InProgress(active) => Some(active),
        }
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveSession> {
        match self {
            SessionPhase::NotStarted => None,
            SessionPhase::InProgress(active) => Some(active),
        }
    }

    pub(crate) fn timer_key(&self) -> TimerKey {
        self.active().map_or(TimerKey::Idle, ActiveSession::timer_key)
    }

    /// The one condition under which the countdown may run.
    pub(crate) fn is_answering(&self) -> bool {
        self.active()
            .is_some_and(|a| a.answer == AnswerPhase::Answering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_phase_flags_follow_lock_then_reveal() {
        let answering = AnswerPhase::Answering;
        assert!(!answering.is_locked());
        assert!(!answering.explanation_visible());
        assert_eq!(answering.selected_index(), None);

        let locked = AnswerPhase::Locked { selected: 2 };
        assert!(locked.is_locked());
        assert!(!locked.explanation_visible());
        assert_eq!(locked.selected_index(), Some(2));

        let timed_out = AnswerPhase::Revealed(Resolution::TimedOut);
        assert!(timed_out.is_locked());
        assert!(timed_out.explanation_visible());
        assert_eq!(timed_out.selected_index(), None);
    }

    #[test]
    fn not_started_is_idle() {
        let phase = SessionPhase::default();
        assert_eq!(phase.timer_key(), TimerKey::Idle);
        assert!(!phase.is_answering());
    }
}
