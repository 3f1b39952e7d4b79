//! Restartable per-second countdown.
//!
//! The timer separates two concerns:
//!
//! * **deadline identity**: the restart key and budget. Changing either resets
//!   `remaining_secs` and starts a fresh schedule.
//! * **reaction**: the `on_tick` / `on_elapsed` callbacks. They live in a single
//!   replaceable slot and can be swapped on every `configure` call without
//!   touching the running countdown.
//!
//! The timer does not sleep. A driver owns the real clock and feeds one
//! [`CountdownTimer::tick`] per second, tagged with the [`ScheduleToken`] that
//! was active when the tick was scheduled. Ticks from an older schedule are
//! discarded.

/// Callback invoked after each decrement with the new remaining seconds.
pub type TickFn<C> = Box<dyn FnMut(&mut C, u32) + Send>;

/// Callback invoked once when the countdown reaches zero.
pub type ElapsedFn<C> = Box<dyn FnMut(&mut C) + Send>;

/// Declarative description of the desired timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig<K> {
    pub budget_secs: u32,
    pub running: bool,
    pub restart_key: K,
}

/// The callback slot. Replaced wholesale on every `configure`.
pub struct TimerCallbacks<C> {
    on_tick: TickFn<C>,
    on_elapsed: ElapsedFn<C>,
}

impl<C> TimerCallbacks<C> {
    pub fn new(
        on_tick: impl FnMut(&mut C, u32) + Send + 'static,
        on_elapsed: impl FnMut(&mut C) + Send + 'static,
    ) -> Self {
        Self {
            on_tick: Box::new(on_tick),
            on_elapsed: Box::new(on_elapsed),
        }
    }

    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_, _| {}, |_| {})
    }
}

impl<C> std::fmt::Debug for TimerCallbacks<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TimerCallbacks { .. }")
    }
}

/// Identifies one running schedule: the restart key it belongs to plus a
/// generation that changes every time a schedule is (re)started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleToken<K> {
    key: K,
    generation: u64,
}

impl<K> ScheduleToken<K> {
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What a delivered tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to a schedule that is no longer active.
    Stale,
    /// One second was consumed and time remains.
    Ticked { remaining: u32 },
    /// The countdown reached zero; `on_elapsed` has fired.
    Elapsed,
}

pub struct CountdownTimer<K, C> {
    budget_secs: u32,
    remaining_secs: u32,
    restart_key: Option<K>,
    elapsed: bool,
    schedule: Option<ScheduleToken<K>>,
    generation: u64,
    callbacks: TimerCallbacks<C>,
}

impl<K, C> CountdownTimer<K, C>
where
    K: Clone + PartialEq,
{
    /// A stopped timer showing the full budget, with no restart key yet.
    #[must_use]
    pub fn new(budget_secs: u32) -> Self {
        Self {
            budget_secs,
            remaining_secs: budget_secs,
            restart_key: None,
            elapsed: false,
            schedule: None,
            generation: 0,
            callbacks: TimerCallbacks::noop(),
        }
    }

    /// Apply the desired state for the current logical period.
    ///
    /// Callbacks are always replaced. The countdown only resets when the
    /// restart key or budget differs from the previous call. A zero budget
    /// with `running` set counts as already elapsed and fires `on_elapsed`
    /// immediately.
    pub fn configure(&mut self, config: TimerConfig<K>, callbacks: TimerCallbacks<C>, ctx: &mut C) {
        self.callbacks = callbacks;

        let identity_changed = self.restart_key.as_ref() != Some(&config.restart_key)
            || self.budget_secs != config.budget_secs;
        if identity_changed {
            self.restart_key = Some(config.restart_key);
            self.budget_secs = config.budget_secs;
            self.remaining_secs = config.budget_secs;
            self.elapsed = false;
            self.schedule = None;
        }

        if !config.running {
            self.schedule = None;
            return;
        }
        if self.elapsed || self.schedule.is_some() {
            return;
        }
        if self.remaining_secs == 0 {
            self.finish(ctx);
            return;
        }
        self.start_schedule();
    }

    /// Consume one second of the schedule identified by `token`.
    ///
    /// `on_tick` sees every decrement, including the final one that reaches
    /// zero; `on_elapsed` follows it exactly once.
    pub fn tick(&mut self, token: &ScheduleToken<K>, ctx: &mut C) -> TickOutcome {
        if self.schedule.as_ref() != Some(token) {
            return TickOutcome::Stale;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let remaining = self.remaining_secs;
        (self.callbacks.on_tick)(ctx, remaining);

        if remaining == 0 {
            self.finish(ctx);
            TickOutcome::Elapsed
        } else {
            TickOutcome::Ticked { remaining }
        }
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn budget_secs(&self) -> u32 {
        self.budget_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// True once the countdown hit zero, until the key or budget changes.
    #[must_use]
    pub fn is_elapsed(&self) -> bool {
        self.elapsed
    }

    #[must_use]
    pub fn restart_key(&self) -> Option<&K> {
        self.restart_key.as_ref()
    }

    /// The active schedule, if any. Drivers compare this after every call to
    /// decide whether their clock must be restarted or dropped.
    #[must_use]
    pub fn schedule(&self) -> Option<&ScheduleToken<K>> {
        self.schedule.as_ref()
    }

    fn start_schedule(&mut self) {
        let Some(key) = self.restart_key.clone() else {
            return;
        };
        self.generation = self.generation.wrapping_add(1);
        self.schedule = Some(ScheduleToken {
            key,
            generation: self.generation,
        });
    }

    fn finish(&mut self, ctx: &mut C) {
        self.remaining_secs = 0;
        self.schedule = None;
        self.elapsed = true;
        (self.callbacks.on_elapsed)(ctx);
    }
}

impl<K: std::fmt::Debug, C> std::fmt::Debug for CountdownTimer<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("budget_secs", &self.budget_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("restart_key", &self.restart_key)
            .field("elapsed", &self.elapsed)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        ticks: Vec<(&'static str, u32)>,
        elapsed: Vec<&'static str>,
    }

    type Timer = CountdownTimer<u32, Recorder>;

    fn callbacks(label: &'static str) -> TimerCallbacks<Recorder> {
        TimerCallbacks::new(
            move |r: &mut Recorder, t| r.ticks.push((label, t)),
            move |r: &mut Recorder| r.elapsed.push(label),
        )
    }

    fn config(key: u32, budget: u32, running: bool) -> TimerConfig<u32> {
        TimerConfig {
            budget_secs: budget,
            running,
            restart_key: key,
        }
    }

    fn token(timer: &Timer) -> ScheduleToken<u32> {
        timer.schedule().cloned().expect("schedule running")
    }

    #[test]
    fn counts_down_and_elapses_once() {
        let mut rec = Recorder::default();
        let mut timer = Timer::new(3);
        timer.configure(config(1, 3, true), callbacks("a"), &mut rec);
        let t = token(&timer);

        assert_eq!(timer.tick(&t, &mut rec), TickOutcome::Ticked { remaining: 2 });
        assert_eq!(timer.tick(&t, &mut rec), TickOutcome::Ticked { remaining: 1 });
        assert_eq!(timer.tick(&t, &mut rec), TickOutcome::Elapsed);
        assert_eq!(timer.tick(&t, &mut rec), TickOutcome::Stale);

        assert_eq!(rec.ticks, vec![("a", 2), ("a", 1), ("a", 0)]);
        assert_eq!(rec.elapsed, vec!["a"]);
        assert_eq!(timer.remaining_secs(), 0);
        assert!(timer.is_elapsed());
        assert!(!timer.is_running());
    }

    #[test]
    fn replacing_callbacks_keeps_the_countdown() {
        let mut rec = Recorder::default();
        let mut timer = Timer::new(5);
        timer.configure(config(1, 5, true), callbacks("old"), &mut rec);
        let t = token(&timer);
        timer.tick(&t, &mut rec);
        timer.tick(&t, &mut rec);

        timer.configure(config(1, 5, true), callbacks("new"), &mut rec);

        assert_eq!(timer.remaining_secs(), 3);
        assert_eq!(timer.schedule(), Some(&t));
        timer.tick(&t, &mut rec);
        assert_eq!(rec.ticks.last(), Some(&("new", 2)));
    }

    #[test]
    fn key_change_resets_and_invalidates_old_ticks() {
        let mut rec = Recorder::default();
        let mut timer = Timer::new(5);
        timer.configure(config(1, 5, true), callbacks("a"), &mut rec);
        let old = token(&timer);
        timer.tick(&old, &mut rec);

        timer.configure(config(2, 5, true), callbacks("a"), &mut rec);
        let new = token(&timer);

        assert_ne!(old, new);
        assert_eq!(timer.remaining_secs(), 5);
        assert_eq!(timer.tick(&old, &mut rec), TickOutcome::Stale);
        assert_eq!(timer.remaining_secs(), 5);
        assert_eq!(timer.tick(&new, &mut rec), TickOutcome::Ticked { remaining: 4 });
    }

    #[test]
    fn budget_change_resets() {
        let mut rec = Recorder::default();
        let mut timer = Timer::new(5);
        timer.configure(config(1, 5, true), callbacks("a"), &mut rec);
        let t = token(&timer);
        timer.tick(&t, &mut rec);

        timer.configure(config(1, 8, true), callbacks("a"), &mut rec);
        assert_eq!(timer.remaining_secs(), 8);
        assert_eq!(timer.tick(&t, &mut rec), TickOutcome::Stale);
    }

    #[test]
    fn stopping_freezes_and_resuming_continues() {
        let mut rec = Recorder::default();
        let mut timer = Timer::new(10);
        timer.configure(config(1, 10, true), callbacks("a"), &mut rec);
        let first = token(&timer);
        timer.tick(&first, &mut rec);
        timer.tick(&first, &mut rec);

        timer.configure(config(1, 10, false), callbacks("a"), &mut rec);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_secs(), 8);
        assert_eq!(timer.tick(&first, &mut rec), TickOutcome::Stale);

        timer.configure(config(1, 10, true), callbacks("a"), &mut rec);
        let second = token(&timer);
        assert_ne!(first, second);
        assert_eq!(timer.tick(&second, &mut rec), TickOutcome::Ticked { remaining: 7 });
    }

    #[test]
    fn key_change_while_stopped_shows_full_budget() {
        let mut rec = Recorder::default();
        let mut timer = Timer::new(10);
        timer.configure(config(1, 10, true), callbacks("a"), &mut rec);
        let t = token(&timer);
        timer.tick(&t, &mut rec);

        timer.configure(config(2, 10, false), callbacks("a"), &mut rec);
        assert_eq!(timer.remaining_secs(), 10);
        assert!(timer.schedule().is_none());
    }

    #[test]
    fn zero_budget_elapses_immediately_once() {
        let mut rec = Recorder::default();
        let mut timer = Timer::new(0);
        timer.configure(config(1, 0, true), callbacks("a"), &mut rec);
        assert_eq!(rec.elapsed, vec!["a"]);
        assert!(rec.ticks.is_empty());
        assert!(!timer.is_running());

        timer.configure(config(1, 0, true), callbacks("a"), &mut rec);
        assert_eq!(rec.elapsed.len(), 1);
    }

    #[test]
    fn elapsed_timer_needs_a_new_key_to_run_again() {
        let mut rec = Recorder::default();
        let mut timer = Timer::new(1);
        timer.configure(config(1, 1, true), callbacks("a"), &mut rec);
        let t = token(&timer);
        assert_eq!(timer.tick(&t, &mut rec), TickOutcome::Elapsed);

        timer.configure(config(1, 1, true), callbacks("a"), &mut rec);
        assert!(timer.schedule().is_none());
        assert_eq!(timer.remaining_secs(), 0);

        timer.configure(config(2, 1, true), callbacks("a"), &mut rec);
        assert!(timer.is_running());
        assert_eq!(timer.remaining_secs(), 1);
        assert!(!timer.is_elapsed());
    }
}
