#![forbid(unsafe_code)]

pub mod countdown;
pub mod model;

pub use countdown::{CountdownTimer, ScheduleToken, TickOutcome, TimerCallbacks, TimerConfig};
