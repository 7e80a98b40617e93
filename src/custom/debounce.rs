// Trailing-edge debounce over the host scheduler.

use std::{cell::Cell, rc::Rc, time::Duration};

use crate::host::scheduler::{Scheduler, TimerId};

/// At most one scheduled action is ever outstanding: each `call` cancels
/// the pending timeout and schedules a fresh one, so only the last call in
/// a burst fires, one quiet period after it.
pub struct Debounce {
    scheduler: Rc<dyn Scheduler>,
    wait: Duration,
    pending: Cell<Option<TimerId>>,
}

impl Debounce {
    pub fn new(scheduler: Rc<dyn Scheduler>, wait: Duration) -> Self {
        Self {
            scheduler,
            wait,
            pending: Cell::new(None),
        }
    }

    pub fn call(&self, callback: Box<dyn FnOnce()>) {
        if let Some(id) = self.pending.take() {
            self.scheduler.clear_timeout(id);
        }
        let id = self.scheduler.set_timeout(self.wait, callback);
        self.pending.set(Some(id));
    }

    /// Forget the pending handle; the callback calls this as its first
    /// step so the next `call` does not cancel a dead handle.
    pub fn mark_fired(&self) {
        self.pending.set(None);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}
