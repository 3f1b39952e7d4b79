use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question budget must be between 1 and 3600 seconds, got {0}")]
    InvalidBudget(u32),

    #[error("award points must be > 0")]
    InvalidAward,

    #[error("warning window ({warning}s) cannot exceed the budget ({budget}s)")]
    WarningExceedsBudget { warning: u32, budget: u32 },

    #[error("reveal delay must be at most 5000 ms, got {0}")]
    InvalidRevealDelay(u32),
}

/// Tuning knobs for a quiz session.
///
/// Defaults match the classic gameshow rules:
/// - 20 seconds per question
/// - 10 points per correct answer, no time bonus
/// - warning ticks during the last 5 seconds
/// - explanation shown 300 ms after a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    budget_secs: u32,
    award_points: u32,
    warning_secs: u32,
    reveal_delay_ms: u32,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            budget_secs: 20,
            award_points: 10,
            warning_secs: 5,
            reveal_delay_ms: 300,
        }
    }
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` when any value is outside its allowed range.
    pub fn new(
        budget_secs: u32,
        award_points: u32,
        warning_secs: u32,
        reveal_delay_ms: u32,
    ) -> Result<Self, SettingsError> {
        if !(1..=3600).contains(&budget_secs) {
            return Err(SettingsError::InvalidBudget(budget_secs));
        }
        if award_points == 0 {
            return Err(SettingsError::InvalidAward);
        }
        if warning_secs > budget_secs {
            return Err(SettingsError::WarningExceedsBudget {
                warning: warning_secs,
                budget: budget_secs,
            });
        }
        if reveal_delay_ms > 5000 {
            return Err(SettingsError::InvalidRevealDelay(reveal_delay_ms));
        }

        Ok(Self {
            budget_secs,
            award_points,
            warning_secs,
            reveal_delay_ms,
        })
    }

    /// Default rules with a different per-question budget.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the budget is invalid or shorter than the warning window.
    pub fn with_budget(budget_secs: u32) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        Self::new(
            budget_secs,
            defaults.award_points,
            defaults.warning_secs.min(budget_secs),
            defaults.reveal_delay_ms,
        )
    }

    #[must_use]
    pub fn budget_secs(&self) -> u32 {
        self.budget_secs
    }

    #[must_use]
    pub fn award_points(&self) -> u32 {
        self.award_points
    }

    /// Ticks at or below this many remaining seconds produce a warning cue.
    #[must_use]
    pub fn warning_secs(&self) -> u32 {
        self.warning_secs
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.reveal_delay_ms))
    }
}
