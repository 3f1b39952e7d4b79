use rand::RngCore;
use std::fmt;

use quiz_core::model::{Question, QuestionBank, QuizSettings, SessionOrder};
use quiz_core::{CountdownTimer, ScheduleToken, TickOutcome, TimerCallbacks, TimerConfig};
use storage::{QuestionRepository, load_bank};

use super::intent::Intent;
use super::state::{ActiveSession, AnswerPhase, Resolution, SessionPhase, TimerKey};
use super::view::SessionSnapshot;
use crate::cues::{Cue, CueEmitter};
use crate::error::SessionError;

//
// ─── CALLBACK CONTEXT ──────────────────────────────────────────────────────────
//

/// Everything the timer callbacks may touch. Kept apart from the timer so the
/// timer can borrow it mutably while ticking.
pub(crate) struct SessionCore {
    bank: QuestionBank,
    settings: QuizSettings,
    cues: Box<dyn CueEmitter>,
    rng: Option<Box<dyn RngCore + Send>>,
    epoch: u64,
    phase: SessionPhase,
}

impl SessionCore {
    fn on_tick(&mut self, key: TimerKey, remaining: u32) {
        if self.phase.timer_key() != key || !self.phase.is_answering() {
            tracing::trace!(?key, remaining, "ignoring tick for inactive question");
            return;
        }
        if remaining <= self.settings.warning_secs() {
            self.cues.emit(Cue::TickWarning);
        }
    }

    fn on_elapsed(&mut self, key: TimerKey) {
        if self.phase.timer_key() != key {
            tracing::debug!(?key, "discarding elapsed signal for inactive question");
            return;
        }
        let Some(active) = self.phase.active_mut() else {
            return;
        };
        if active.answer != AnswerPhase::Answering {
            tracing::debug!(?key, "discarding elapsed signal for locked question");
            return;
        }
        active.answer = AnswerPhase::Revealed(Resolution::TimedOut);
        tracing::info!(index = active.index, "question timed out");
    }

    fn draw_order(&mut self) -> SessionOrder {
        match self.rng.as_mut() {
            Some(rng) => self.bank.new_session_order_with(&mut **rng),
            None => self.bank.new_session_order(),
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for one quiz playthrough.
///
/// All mutation goes through the intent methods plus the two clock entry
/// points, [`QuizSession::tick`] and [`QuizSession::complete_reveal`]. After
/// every transition the countdown is reconfigured so that it runs if and only
/// if the current question is still being answered.
pub struct QuizSession {
    core: SessionCore,
    timer: CountdownTimer<TimerKey, SessionCore>,
}

impl QuizSession {
    #[must_use]
    pub fn new(bank: QuestionBank, settings: QuizSettings, cues: impl CueEmitter + 'static) -> Self {
        let timer = CountdownTimer::new(settings.budget_secs());
        let mut session = Self {
            core: SessionCore {
                bank,
                settings,
                cues: Box::new(cues),
                rng: None,
                epoch: 0,
                phase: SessionPhase::NotStarted,
            },
            timer,
        };
        session.sync_timer();
        session
    }

    /// Build an idle session from already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` for an empty list or duplicate ids.
    pub fn from_questions(
        questions: Vec<Question>,
        settings: QuizSettings,
        cues: impl CueEmitter + 'static,
    ) -> Result<Self, SessionError> {
        let bank = QuestionBank::new(questions)?;
        Ok(Self::new(bank, settings, cues))
    }

    /// Load the bank from a repository and build an idle session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the bank cannot be loaded or is invalid.
    pub async fn from_repository(
        repo: &dyn QuestionRepository,
        settings: QuizSettings,
        cues: impl CueEmitter + 'static,
    ) -> Result<Self, SessionError> {
        let bank = load_bank(repo).await?;
        Ok(Self::new(bank, settings, cues))
    }

    /// Use `rng` for every future session ordering instead of the thread RNG.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.core.rng = Some(Box::new(rng));
        self
    }

    /// Begin a new playthrough. From an in-progress session this acts as a restart.
    pub fn start(&mut self) {
        self.core.epoch += 1;
        let order = self.core.draw_order();
        let total = order.len();
        self.core.phase = SessionPhase::InProgress(ActiveSession {
            epoch: self.core.epoch,
            order,
            index: 0,
            score: 0,
            answer: AnswerPhase::Answering,
        });
        tracing::info!(epoch = self.core.epoch, total, "quiz session started");
        self.sync_timer();
    }

    /// Leave the current playthrough, discarding score and order, then start again.
    pub fn restart(&mut self) {
        self.core.phase = SessionPhase::NotStarted;
        self.sync_timer();
        self.start();
    }

    /// Select a choice for the current question.
    ///
    /// Returns `false` without side effects when the session is not answering
    /// or `index` is out of range.
    pub fn select_choice(&mut self, index: usize) -> bool {
        let SessionCore {
            phase,
            cues,
            settings,
            ..
        } = &mut self.core;
        let Some(active) = phase.active_mut() else {
            tracing::debug!(index, "ignoring selection: session not started");
            return false;
        };
        if active.answer != AnswerPhase::Answering {
            tracing::debug!(index, "ignoring selection: question already locked");
            return false;
        }
        let Some(question) = active.current_question() else {
            return false;
        };
        if index >= question.choice_count() {
            tracing::debug!(
                index,
                choices = question.choice_count(),
                "ignoring out-of-range selection"
            );
            return false;
        }
        let correct = question.is_correct(index);

        cues.emit(Cue::Click);
        active.answer = AnswerPhase::Locked { selected: index };
        if correct {
            active.score = active.score.saturating_add(settings.award_points());
            cues.emit(Cue::Correct);
        } else {
            cues.emit(Cue::Incorrect);
        }
        tracing::info!(
            question = active.index,
            selected = index,
            correct,
            score = active.score,
            "choice selected"
        );

        self.sync_timer();
        true
    }

    /// Show the explanation for a selection once the reveal delay has passed.
    ///
    /// `key` must match the question that was selected; anything else is stale.
    pub fn complete_reveal(&mut self, key: TimerKey) -> bool {
        if self.core.phase.timer_key() != key {
            tracing::debug!(?key, "discarding stale reveal");
            return false;
        }
        let Some(active) = self.core.phase.active_mut() else {
            return false;
        };
        let AnswerPhase::Locked { selected } = active.answer else {
            return false;
        };
        active.answer = AnswerPhase::Revealed(Resolution::Selected(selected));
        self.sync_timer();
        true
    }

    /// Move past a revealed question. After the last one the session ends and
    /// nothing about it is retained.
    pub fn advance(&mut self) -> bool {
        let Some(active) = self.core.phase.active_mut() else {
            tracing::debug!("ignoring advance: session not started");
            return false;
        };
        if !matches!(active.answer, AnswerPhase::Revealed(_)) {
            tracing::debug!(question = active.index, "ignoring advance: not revealed");
            return false;
        }

        if active.is_last() {
            tracing::info!(score = active.score, "quiz session finished");
            self.core.phase = SessionPhase::NotStarted;
        } else {
            active.index += 1;
            active.answer = AnswerPhase::Answering;
        }
        self.sync_timer();
        true
    }

    /// Deliver one clock tick for the schedule identified by `token`.
    pub fn tick(&mut self, token: &ScheduleToken<TimerKey>) -> TickOutcome {
        let outcome = self.timer.tick(token, &mut self.core);
        match outcome {
            TickOutcome::Stale => {
                tracing::trace!(key = ?token.key(), generation = token.generation(), "stale tick");
            }
            TickOutcome::Elapsed => self.sync_timer(),
            TickOutcome::Ticked { .. } => {}
        }
        outcome
    }

    /// Dispatch a renderer intent. Returns whether it changed anything.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Start => {
                self.start();
                true
            }
            Intent::SelectChoice(index) => self.select_choice(index),
            Intent::Advance => self.advance(),
            Intent::Restart => {
                self.restart();
                true
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let total = self.core.bank.len();
        let remaining_secs = self.timer.remaining_secs();
        let budget_secs = self.core.settings.budget_secs();

        match self.core.phase.active() {
            None => SessionSnapshot {
                started: false,
                current_index: 0,
                total,
                score: 0,
                question: None,
                remaining_secs,
                budget_secs,
                selected_index: None,
                locked: false,
                explanation_visible: false,
            },
            Some(active) => SessionSnapshot {
                started: true,
                current_index: active.index,
                total,
                score: active.score,
                question: active.current_question().cloned(),
                remaining_secs,
                budget_secs,
                selected_index: active.answer.selected_index(),
                locked: active.answer.is_locked(),
                explanation_visible: active.answer.explanation_visible(),
            },
        }
    }

    /// The countdown schedule a driver should be ticking, if any.
    #[must_use]
    pub fn schedule(&self) -> Option<&ScheduleToken<TimerKey>> {
        self.timer.schedule()
    }

    /// The question waiting for its reveal delay, if any.
    #[must_use]
    pub fn pending_reveal(&self) -> Option<TimerKey> {
        self.core
            .phase
            .active()
            .filter(|a| matches!(a.answer, AnswerPhase::Locked { .. }))
            .map(ActiveSession::timer_key)
    }

    #[must_use]
    pub fn session_order(&self) -> Option<&SessionOrder> {
        self.core.phase.active().map(|a| &a.order)
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.core.phase.active().is_some()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.core.phase.active().map_or(0, |a| a.score)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.core.settings
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.core.bank
    }

    fn sync_timer(&mut self) {
        let key = self.core.phase.timer_key();
        let config = TimerConfig {
            budget_secs: self.core.settings.budget_secs(),
            running: self.core.phase.is_answering(),
            restart_key: key,
        };
        self.timer
            .configure(config, Self::callbacks(key), &mut self.core);
    }

    fn callbacks(key: TimerKey) -> TimerCallbacks<SessionCore> {
        TimerCallbacks::new(
            move |core: &mut SessionCore, remaining| core.on_tick(key, remaining),
            move |core: &mut SessionCore| core.on_elapsed(key),
        )
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("bank_len", &self.core.bank.len())
            .field("settings", &self.core.settings)
            .field("epoch", &self.core.epoch)
            .field("phase", &self.core.phase)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
