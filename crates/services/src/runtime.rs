//! Tokio driver for a [`QuizSession`].
//!
//! The session lives on a single task, which is the only place its state is
//! mutated. The task multiplexes three wake-up sources: renderer intents, the
//! one-second countdown interval, and the reveal delay after a selection.
//! Interval and delay are rebuilt whenever the session's schedule token or
//! pending reveal changes, so a clock started for one question can never fire
//! into another.

use std::future;
use std::pin::Pin;
use std::time::Duration;

use quiz_core::ScheduleToken;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};

use crate::error::SessionError;
use crate::sessions::{Intent, QuizSession, SessionSnapshot, TimerKey};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Renderer-side handle to a running quiz.
#[derive(Debug)]
pub struct QuizHandle {
    intents: mpsc::UnboundedSender<Intent>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<()>,
}

impl QuizHandle {
    /// Queue an intent for the session task.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the task has stopped.
    pub fn send(&self, intent: Intent) -> Result<(), SessionError> {
        self.intents.send(intent).map_err(|_| SessionError::Closed)
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified whenever the snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Close the intent channel and wait for the task to finish.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Runtime` if the task panicked or was cancelled.
    pub async fn shutdown(self) -> Result<(), SessionError> {
        drop(self.intents);
        self.task
            .await
            .map_err(|e| SessionError::Runtime(e.to_string()))
    }
}

/// Move `session` onto its own task and return a handle to drive it.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn spawn_quiz(session: QuizSession) -> QuizHandle {
    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
    let task = tokio::spawn(run(session, intent_rx, snapshot_tx));
    QuizHandle {
        intents: intent_tx,
        snapshots: snapshot_rx,
        task,
    }
}

struct Ticker {
    token: ScheduleToken<TimerKey>,
    interval: Interval,
}

struct PendingReveal {
    key: TimerKey,
    sleep: Pin<Box<Sleep>>,
}

enum Wake {
    Intent(Intent),
    Tick(ScheduleToken<TimerKey>),
    Reveal(TimerKey),
}

async fn run(
    mut session: QuizSession,
    mut intents: mpsc::UnboundedReceiver<Intent>,
    snapshots: watch::Sender<SessionSnapshot>,
) {
    let mut ticker: Option<Ticker> = None;
    let mut reveal: Option<PendingReveal> = None;

    loop {
        reconcile(&session, &mut ticker, &mut reveal);

        let wake = tokio::select! {
            intent = intents.recv() => match intent {
                Some(intent) => Wake::Intent(intent),
                None => break,
            },
            token = next_tick(&mut ticker) => Wake::Tick(token),
            key = reveal_due(&mut reveal) => Wake::Reveal(key),
        };

        match wake {
            Wake::Intent(intent) => {
                tracing::debug!(?intent, "intent received");
                session.apply(intent);
            }
            Wake::Tick(token) => {
                session.tick(&token);
            }
            Wake::Reveal(key) => {
                reveal = None;
                session.complete_reveal(key);
            }
        }

        let next = session.snapshot();
        snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    tracing::debug!("quiz runtime stopped");
}

/// Bring the interval and reveal delay in line with the session.
fn reconcile(session: &QuizSession, ticker: &mut Option<Ticker>, reveal: &mut Option<PendingReveal>) {
    match session.schedule() {
        Some(token) if ticker.as_ref().map(|t| &t.token) != Some(token) => {
            let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::trace!(key = ?token.key(), generation = token.generation(), "countdown scheduled");
            *ticker = Some(Ticker {
                token: token.clone(),
                interval,
            });
        }
        Some(_) => {}
        None => *ticker = None,
    }

    match session.pending_reveal() {
        Some(key) if reveal.as_ref().map(|r| r.key) != Some(key) => {
            *reveal = Some(PendingReveal {
                key,
                sleep: Box::pin(time::sleep(session.settings().reveal_delay())),
            });
        }
        Some(_) => {}
        None => *reveal = None,
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) -> ScheduleToken<TimerKey> {
    match ticker {
        Some(t) => {
            t.interval.tick().await;
            t.token.clone()
        }
        None => future::pending().await,
    }
}

async fn reveal_due(reveal: &mut Option<PendingReveal>) -> TimerKey {
    match reveal {
        Some(r) => {
            r.sleep.as_mut().await;
            r.key
        }
        None => future::pending().await,
    }
}
