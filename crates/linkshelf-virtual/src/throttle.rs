//! Leading-edge rate limiting for viewport events.
//!
//! The first event of a burst passes; everything after it is dropped until
//! the interval elapses. There is no trailing call, so the last scroll
//! position of a burst may only be picked up by the next event.

use std::cell::Cell;
use std::rc::Rc;

use linkshelf_core::timers::{TimerId, Timers};
use web_time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleState {
    Idle,
    /// Holding events until the timer re-opens the gate.
    Throttled(TimerId),
}

pub struct Throttle {
    interval: Duration,
    timers: Rc<Timers>,
    state: Rc<Cell<ThrottleState>>,
}

impl Throttle {
    /// A zero interval lets every event through.
    pub fn new(interval: Duration, timers: Rc<Timers>) -> Self {
        Self {
            interval,
            timers,
            state: Rc::new(Cell::new(ThrottleState::Idle)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> ThrottleState {
        self.state.get()
    }

    pub fn is_throttled(&self) -> bool {
        matches!(self.state.get(), ThrottleState::Throttled(_))
    }

    /// Claims the gate for one event. Returns `false` if the event must be
    /// dropped.
    pub fn try_acquire(&self) -> bool {
        if self.interval.is_zero() {
            return true;
        }
        if let ThrottleState::Throttled(id) = self.state.get() {
            // The host may not have pumped the timer yet.
            let expired = self
                .timers
                .due_at(id)
                .is_none_or(|due| due <= self.timers.now());
            if !expired {
                return false;
            }
            self.timers.clear_timeout(id);
        }

        let state = Rc::downgrade(&self.state);
        let id = self.timers.set_timeout(self.interval, move || {
            if let Some(state) = state.upgrade() {
                state.set(ThrottleState::Idle);
            }
        });
        self.state.set(ThrottleState::Throttled(id));
        true
    }

    /// Runs `f` if the gate is open. Returns whether it ran.
    pub fn run(&self, f: impl FnOnce()) -> bool {
        if self.try_acquire() {
            f();
            true
        } else {
            false
        }
    }

    /// Clears the pending re-enable timer and returns to idle.
    pub fn cancel(&self) {
        if let ThrottleState::Throttled(id) = self.state.get() {
            self.timers.clear_timeout(id);
        }
        self.state.set(ThrottleState::Idle);
    }
}

impl Drop for Throttle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("interval", &self.interval)
            .field("state", &self.state.get())
            .finish()
    }
}
