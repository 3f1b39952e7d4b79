mod intent;
mod service;
mod state;
mod view;

// Public API of the session subsystem.
pub use intent::Intent;
pub use service::QuizSession;
pub use state::TimerKey;
pub use view::SessionSnapshot;
