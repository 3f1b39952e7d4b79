#![forbid(unsafe_code)]

pub mod cues;
pub mod error;
pub mod runtime;
pub mod sessions;

pub use cues::{Cue, CueEmitter, NullCues, RecordingCues};
pub use error::SessionError;
pub use runtime::{QuizHandle, spawn_quiz};
pub use sessions::{Intent, QuizSession, SessionSnapshot, TimerKey};
