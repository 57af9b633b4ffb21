use crate::error::SessionError;

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of one countdown instance.
///
/// `Expired` is terminal: a timer is never restarted, a new session gets a
/// new timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
}

/// What a single tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting down; the new remaining value is attached.
    Running { remaining_secs: u32 },
    /// This tick crossed zero. Reported exactly once per timer.
    JustExpired,
    /// The timer was idle or already expired; nothing changed.
    Noop,
}

//
// ─── COUNTDOWN ─────────────────────────────────────────────────────────────────
//

/// One-second-resolution countdown for a timed assessment.
///
/// The timer does not schedule anything itself; something else calls
/// `tick()` once per second and reacts to `JustExpired`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    state: TimerState,
    remaining_secs: u32,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    /// Creates an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            remaining_secs: 0,
        }
    }

    /// Arms the countdown with the full duration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` when `total_secs` is zero.
    pub fn start(&mut self, total_secs: u32) -> Result<(), SessionError> {
        if total_secs == 0 {
            return Err(SessionError::InvalidDuration);
        }
        self.state = TimerState::Running;
        self.remaining_secs = total_secs;
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// The Running→Expired transition is reported exactly once as
    /// `JustExpired`; any tick after that is a `Noop`.
    pub fn tick(&mut self) -> TimerTick {
        match self.state {
            TimerState::Running => {
                self.remaining_secs = self.remaining_secs.saturating_sub(1);
                if self.remaining_secs == 0 {
                    self.state = TimerState::Expired;
                    TimerTick::JustExpired
                } else {
                    TimerTick::Running {
                        remaining_secs: self.remaining_secs,
                    }
                }
            }
            TimerState::Idle | TimerState::Expired => TimerTick::Noop,
        }
    }

    /// Seconds left on the clock; zero once expired, never negative.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_rejects_zero_duration() {
        let mut timer = CountdownTimer::new();
        let err = timer.start(0).unwrap_err();
        assert!(matches!(err, SessionError::InvalidDuration));
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn tick_counts_down_to_expiry_once() {
        let mut timer = CountdownTimer::new();
        timer.start(3).unwrap();

        assert_eq!(timer.tick(), TimerTick::Running { remaining_secs: 2 });
        assert_eq!(timer.tick(), TimerTick::Running { remaining_secs: 1 });
        assert_eq!(timer.tick(), TimerTick::JustExpired);
        assert!(timer.is_expired());

        // Ticks after expiry change nothing and never re-report.
        assert_eq!(timer.tick(), TimerTick::Noop);
        assert_eq!(timer.tick(), TimerTick::Noop);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn idle_timer_ignores_ticks() {
        let mut timer = CountdownTimer::new();
        assert_eq!(timer.tick(), TimerTick::Noop);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn remaining_matches_started_duration() {
        let mut timer = CountdownTimer::new();
        timer.start(60).unwrap();
        assert_eq!(timer.remaining_secs(), 60);
        assert_eq!(timer.state(), TimerState::Running);
    }
}
