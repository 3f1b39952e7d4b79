use std::fmt;
use std::sync::{Arc, Mutex};

/// Discrete feedback events for the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Click,
    Correct,
    Incorrect,
    TickWarning,
}

impl Cue {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Cue::Click => "click",
            Cue::Correct => "correct",
            Cue::Incorrect => "incorrect",
            Cue::TickWarning => "tick-warning",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget sink for cues. Implementations must not block and have no
/// way to report failure back to the session.
pub trait CueEmitter: Send {
    fn emit(&self, cue: Cue);
}

/// Drops every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCues;

impl CueEmitter for NullCues {
    fn emit(&self, _cue: Cue) {}
}

/// Keeps every emitted cue in order. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingCues {
    log: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingCues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self, cue: Cue) -> usize {
        self.cues().into_iter().filter(|c| *c == cue).count()
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }
}

impl CueEmitter for RecordingCues {
    fn emit(&self, cue: Cue) {
        if let Ok(mut log) = self.log.lock() {
            log.push(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_names_match_audio_contract() {
        let names: Vec<_> = [Cue::Click, Cue::Correct, Cue::Incorrect, Cue::TickWarning]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["click", "correct", "incorrect", "tick-warning"]);
    }

    #[test]
    fn recording_clones_share_log() {
        let rec = RecordingCues::new();
        let other = rec.clone();
        other.emit(Cue::Click);
        other.emit(Cue::TickWarning);
        assert_eq!(rec.cues(), vec![Cue::Click, Cue::TickWarning]);
        assert_eq!(rec.count(Cue::Click), 1);
        rec.clear();
        assert!(other.cues().is_empty());
    }
}
