use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Whether the scheduler should keep firing a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Periodic callback signature. Returning `Stop` retires the schedule.
pub type TickCallback = Box<dyn FnMut() -> TickControl + Send + 'static>;

/// The periodic-tick capability injected into the session runner.
///
/// Production uses [`TokioTicker`]; tests hand-fire ticks through
/// [`ManualTicker`] so countdown behavior is deterministic.
pub trait Ticker: Send + Sync {
    /// Schedule `callback` to fire every `period` until it returns
    /// `Stop` or the returned guard cancels it.
    fn schedule(&self, period: Duration, callback: TickCallback) -> TickerGuard;
}

//
// ─── GUARD ─────────────────────────────────────────────────────────────────────
//

/// Cancellation handle for one scheduled callback.
///
/// Dropping the guard cancels the schedule, so tearing down whatever owns
/// it is enough to stop ticks from firing against a dead session.
pub struct TickerGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickerGuard {
    #[must_use]
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancel explicitly instead of via drop.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for TickerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickerGuard")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

//
// ─── TOKIO BACKEND ─────────────────────────────────────────────────────────────
//

/// Wall-clock ticker backed by a spawned Tokio task.
///
/// `schedule` must be called from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTicker;

impl TokioTicker {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Ticker for TokioTicker {
    fn schedule(&self, period: Duration, mut callback: TickCallback) -> TickerGuard {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first interval tick completes immediately; skip it so the
            // first callback lands one full period after scheduling.
            interval.tick().await;
            loop {
                interval.tick().await;
                if callback() == TickControl::Stop {
                    break;
                }
            }
        });
        TickerGuard::new(move || handle.abort())
    }
}

//
// ─── MANUAL BACKEND ────────────────────────────────────────────────────────────
//

struct ManualSlot {
    callback: TickCallback,
    active: Arc<AtomicBool>,
}

/// Hand-driven ticker for deterministic tests: nothing fires until
/// `fire()` is called, one call per scheduled period elapsed.
#[derive(Clone, Default)]
pub struct ManualTicker {
    slots: Arc<Mutex<Vec<ManualSlot>>>,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire one tick on every active schedule.
    pub fn fire(&self) {
        let Ok(mut slots) = self.slots.lock() else {
            return;
        };
        for slot in slots.iter_mut() {
            if !slot.active.load(Ordering::Acquire) {
                continue;
            }
            if (slot.callback)() == TickControl::Stop {
                slot.active.store(false, Ordering::Release);
            }
        }
        slots.retain(|slot| slot.active.load(Ordering::Acquire));
    }

    /// Fire `n` ticks back to back.
    pub fn fire_many(&self, n: usize) {
        for _ in 0..n {
            self.fire();
        }
    }

    /// Number of schedules still active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots
            .lock()
            .map(|slots| {
                slots
                    .iter()
                    .filter(|slot| slot.active.load(Ordering::Acquire))
                    .count()
            })
            .unwrap_or(0)
    }
}

impl Ticker for ManualTicker {
    fn schedule(&self, _period: Duration, callback: TickCallback) -> TickerGuard {
        let active = Arc::new(AtomicBool::new(true));
        if let Ok(mut slots) = self.slots.lock() {
            slots.push(ManualSlot {
                callback,
                active: Arc::clone(&active),
            });
        }
        TickerGuard::new(move || active.store(false, Ordering::Release))
    }
}

impl fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTicker")
            .field("active", &self.active_count())
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
