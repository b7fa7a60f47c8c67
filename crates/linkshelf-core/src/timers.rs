//! Fire-once timeouts for a single-threaded event loop.
//!
//! The host pumps [`Timers::run_due`] from its loop (once per frame, or after
//! advancing a [`TestClock`](crate::clock::TestClock) in tests). Callbacks run
//! on the pumping thread, in due order, with ties broken by scheduling order.

use std::cell::{Cell, RefCell};

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

new_key_type! {
    pub struct TimerId;
}

struct Pending {
    due: Instant,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

pub struct Timers {
    clock: Box<dyn Clock>,
    pending: RefCell<SlotMap<TimerId, Pending>>,
    next_seq: Cell<u64>,
}

impl Default for Timers {
    fn default() -> Self {
        Self::system()
    }
}

impl Timers {
    pub fn new(clock: impl Clock) -> Self {
        Self {
            clock: Box::new(clock),
            pending: RefCell::new(SlotMap::with_key()),
            next_seq: Cell::new(0),
        }
    }

    pub fn system() -> Self {
        Self::new(SystemClock)
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn set_timeout(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.pending.borrow_mut().insert(Pending {
            due: self.now() + delay,
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancels a pending timeout. Returns `false` if it already fired or was
    /// cleared.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.pending.borrow_mut().remove(id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.borrow().contains_key(id)
    }

    pub fn due_at(&self, id: TimerId) -> Option<Instant> {
        self.pending.borrow().get(id).map(|p| p.due)
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.borrow().values().map(|p| p.due).min()
    }

    /// Fires every timeout whose deadline has passed and returns how many ran.
    ///
    /// Timeouts scheduled by a callback during this call wait for the next
    /// pump, so a callback that reschedules itself cannot spin forever.
    pub fn run_due(&self) -> usize {
        let horizon = self.next_seq.get();
        let mut fired = 0;
        loop {
            let now = self.now();
            let next = {
                let pending = self.pending.borrow();
                pending
                    .iter()
                    .filter(|(_, p)| p.due <= now && p.seq < horizon)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(id, _)| id)
            };
            let Some(id) = next else { break };
            let timer = self.pending.borrow_mut().remove(id);
            if let Some(timer) = timer {
                (timer.callback)();
                fired += 1;
            }
        }
        fired
    }
}

impl std::fmt::Debug for Timers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timers")
            .field("pending", &self.pending())
            .finish()
    }
}
