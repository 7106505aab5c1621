//! Question countdown engine
//!
//! This module derives the decrementing "time remaining" value for the
//! active question. A fresh reset starts the full duration when a new
//! question arrives over the channel; reconciliation approximates the
//! remaining time for a participant who joins mid-game, using the
//! server-supplied session start against the local wall clock. The local
//! timer is for display only: it never triggers question transitions, and
//! authoritative events overrule it.

use tracing::debug;
use web_time::{Duration, Instant, SystemTime};

use crate::clock::Clock;

/// Locally-ticking countdown for the active question
///
/// `time_remaining` is always within `[0, duration]` in whole seconds.
/// Ticking stops at zero and is only restarted by a fresh reset; a
/// question-ended event forces it to zero regardless of local drift.
#[derive(Debug)]
pub struct Countdown {
    /// Fixed duration of a question
    duration: Duration,
    /// Whole seconds left in the answer window
    time_remaining: u64,
    /// Monotonic reference for elapsed-time measurement, set when the
    /// question starts locally and cleared only by the next reset
    start_mark: Option<Instant>,
}

impl Countdown {
    /// Creates a stopped countdown with the given question duration
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            time_remaining: 0,
            start_mark: None,
        }
    }

    /// Starts the countdown fresh for a newly advanced question
    ///
    /// Sets the full duration and marks "now" on the monotonic clock as the
    /// question's start reference.
    pub fn fresh_reset(&mut self, clock: &impl Clock) {
        self.time_remaining = self.duration.as_secs();
        self.start_mark = Some(clock.now());
        debug!(seconds = self.time_remaining, "countdown reset");
    }

    /// Approximates the remaining time for a mid-game join
    ///
    /// Given the session's wall-clock start and the active question's
    /// ordinal position, computes how far into the question's window the
    /// session already is and clamps the result to `[0, duration]`. The
    /// server's wall clock is compared against the local one without skew
    /// compensation; the approximation is corrected by the next
    /// authoritative event. The local monotonic "now" becomes the
    /// question's start reference for elapsed-time measurement.
    pub fn reconcile(
        &mut self,
        session_started_at: SystemTime,
        question_index: usize,
        clock: &impl Clock,
    ) {
        let duration_seconds = self.duration.as_secs() as i64;
        let elapsed_seconds = clock
            .system_now()
            .duration_since(session_started_at)
            .unwrap_or_default()
            .as_secs() as i64;
        let question_start_offset = question_index as i64 * duration_seconds;

        let remaining = duration_seconds - (elapsed_seconds - question_start_offset);
        self.time_remaining = remaining.clamp(0, duration_seconds) as u64;
        self.start_mark = Some(clock.now());
        debug!(
            seconds = self.time_remaining,
            elapsed_seconds, question_index, "countdown reconciled"
        );
    }

    /// Decrements the countdown by one second
    ///
    /// No-op once the countdown has reached zero; reaching zero never
    /// triggers a question transition by itself.
    pub fn tick(&mut self) {
        if self.time_remaining > 0 {
            self.time_remaining -= 1;
        }
    }

    /// Forces the countdown to zero
    ///
    /// Used when the server declares the answer window closed, regardless
    /// of what the local clock thinks.
    pub fn expire(&mut self) {
        self.time_remaining = 0;
    }

    /// Returns the whole seconds left in the answer window
    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    /// Returns whether the answer window has closed locally
    pub fn is_expired(&self) -> bool {
        self.time_remaining == 0
    }

    /// Measures the time elapsed since the question started
    ///
    /// The measurement is taken on the monotonic clock against the start
    /// reference, never negative, and capped at the question duration even
    /// if the local clock recorded a longer interval (a suspended tab, for
    /// example). With no start reference the full duration is reported.
    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        self.start_mark.map_or(self.duration, |mark| {
            clock.now().saturating_duration_since(mark).min(self.duration)
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Clock advanced manually by tests
    struct ManualClock {
        base: Instant,
        wall_base: SystemTime,
        offset: Cell<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                wall_base: SystemTime::now(),
                offset: Cell::new(Duration::ZERO),
            }
        }

        fn advance(&self, duration: Duration) {
            self.offset.set(self.offset.get() + duration);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + self.offset.get()
        }

        fn system_now(&self) -> SystemTime {
            self.wall_base + self.offset.get()
        }
    }

    const DURATION: Duration = Duration::from_secs(15);

    #[test]
    fn test_fresh_reset_sets_full_duration() {
        let clock = ManualClock::new();
        let mut countdown = Countdown::new(DURATION);

        countdown.fresh_reset(&clock);

        assert_eq!(countdown.time_remaining(), 15);
        assert!(!countdown.is_expired());
    }

    #[test]
    fn test_tick_decrements_and_stops_at_zero() {
        let clock = ManualClock::new();
        let mut countdown = Countdown::new(DURATION);
        countdown.fresh_reset(&clock);

        for _ in 0..20 {
            countdown.tick();
            assert!(countdown.time_remaining() <= 15);
        }

        assert_eq!(countdown.time_remaining(), 0);
        assert!(countdown.is_expired());
    }

    #[test]
    fn test_expire_forces_zero() {
        let clock = ManualClock::new();
        let mut countdown = Countdown::new(DURATION);
        countdown.fresh_reset(&clock);

        countdown.expire();
        assert_eq!(countdown.time_remaining(), 0);
    }

    #[test]
    fn test_reconcile_mid_question() {
        let clock = ManualClock::new();
        let session_start = clock.system_now();
        let mut countdown = Countdown::new(DURATION);

        // Third question active, 37 seconds into the session:
        // offset 30s, 7s into the question, 8s remain.
        clock.advance(Duration::from_secs(37));
        countdown.reconcile(session_start, 2, &clock);

        assert_eq!(countdown.time_remaining(), 8);
    }

    #[test]
    fn test_reconcile_clamps_to_duration() {
        let clock = ManualClock::new();
        let session_start = clock.system_now();
        let mut countdown = Countdown::new(DURATION);

        // Local clock behind the session start yields zero elapsed
        countdown.reconcile(session_start + Duration::from_secs(60), 0, &clock);
        assert_eq!(countdown.time_remaining(), 15);
    }

    #[test]
    fn test_reconcile_clamps_to_zero() {
        let clock = ManualClock::new();
        let session_start = clock.system_now();
        let mut countdown = Countdown::new(DURATION);

        // 40 seconds in while the first question is still declared active
        clock.advance(Duration::from_secs(40));
        countdown.reconcile(session_start, 0, &clock);

        assert_eq!(countdown.time_remaining(), 0);
        assert!(countdown.is_expired());
    }

    #[test]
    fn test_elapsed_is_capped_at_duration() {
        let clock = ManualClock::new();
        let mut countdown = Countdown::new(DURATION);
        countdown.fresh_reset(&clock);

        clock.advance(Duration::from_secs(20));
        assert_eq!(countdown.elapsed(&clock), Duration::from_secs(15));
    }

    #[test]
    fn test_elapsed_measures_since_reset() {
        let clock = ManualClock::new();
        let mut countdown = Countdown::new(DURATION);
        countdown.fresh_reset(&clock);

        clock.advance(Duration::from_millis(4_200));
        assert_eq!(countdown.elapsed(&clock), Duration::from_millis(4_200));
    }

    #[test]
    fn test_elapsed_without_start_mark_reports_full_duration() {
        let clock = ManualClock::new();
        let countdown = Countdown::new(DURATION);

        assert_eq!(countdown.elapsed(&clock), DURATION);
    }
}
